use crate::models::{Cpf, Email, LedgerError, User};
use crate::types::UserId;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// In-memory user directory keyed by user id, with unique CPF and e-mail indexes.
pub struct UserStorage {
    users: DashMap<UserId, User>,
    by_cpf: DashMap<Cpf, UserId>,
    by_email: DashMap<Email, UserId>
}

impl UserStorage {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            by_cpf: DashMap::new(),
            by_email: DashMap::new()
        }
    }

    /// Stores a new user after claiming its CPF and e-mail.
    ///
    /// # Errors
    /// Returns `LedgerError::DuplicateIdentifier` if either identifier already
    /// belongs to a stored user. Nothing is stored in that case.
    pub fn insert_new(&self, user: User) -> Result<(), LedgerError> {
        //NOTE: Claims always go CPF first, then e-mail, and the user map is only
        //      touched once both index guards are released.
        let Entry::Vacant(cpf_slot) = self.by_cpf.entry(user.cpf().clone()) else {
            return Err(duplicate("CPF", user.cpf()))
        };

        let Entry::Vacant(email_slot) = self.by_email.entry(user.email().clone()) else {
            return Err(duplicate("email", user.email()))
        };

        cpf_slot.insert(user.id());
        email_slot.insert(user.id());
        self.users.insert(user.id(), user);

        Ok(())
    }

    /// Moves a user to a new e-mail address, releasing the old one.
    ///
    /// # Errors
    /// Returns `LedgerError` if the user is unknown, the address is unchanged,
    /// or the address belongs to another user.
    pub fn change_email(&self, user_id: UserId, email: Email) -> Result<User, LedgerError> {
        //NOTE: The user entry stays locked until the index is updated, so two
        //      changes to the same user cannot interleave.
        let mut user = self.users.get_mut(&user_id).ok_or(LedgerError::UserNotFound { user_id })?;
        let previous = user.email().clone();

        if previous == email {
            return user.change_email(email).map(|_| user.clone())
        }

        match self.by_email.entry(email.clone()) {
            Entry::Occupied(owner) => return Err(duplicate("email", owner.key())),
            Entry::Vacant(slot) => {
                slot.insert(user_id);
            }
        }

        self.by_email.remove(&previous);
        user.change_email(email)?;

        Ok(user.clone())
    }

    pub fn find(&self, user_id: UserId) -> Option<User> {
        self.users.get(&user_id).map(|entry| entry.value().clone())
    }

    pub fn find_by_cpf(&self, cpf: &Cpf) -> Option<User> {
        let user_id = *self.by_cpf.get(cpf)?.value();
        self.find(user_id)
    }

    pub fn find_by_email(&self, email: &Email) -> Option<User> {
        let user_id = *self.by_email.get(email)?.value();
        self.find(user_id)
    }

    pub fn exists(&self, user_id: UserId) -> bool {
        self.users.contains_key(&user_id)
    }

    pub fn remove(&self, user_id: UserId) -> Option<User> {
        let (_, user) = self.users.remove(&user_id)?;

        self.by_cpf.remove(user.cpf());
        self.by_email.remove(user.email());

        Some(user)
    }

    pub fn all(&self) -> Vec<User> {
        self.users.iter().map(|entry| entry.value().clone()).collect()
    }
}

impl Default for UserStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn duplicate(field: &'static str, value: &impl ToString) -> LedgerError {
    LedgerError::DuplicateIdentifier { field, value: value.to_string() }
}
