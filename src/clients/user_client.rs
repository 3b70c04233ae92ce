use std::cmp::Ordering;
use std::str::FromStr;

use tracing::{debug, info, instrument, warn};

use crate::collection::{Collections, RecordId, Snapshot};
use crate::domain::{Registration, Role, User, UserPatch};
use crate::user::{
    validate_registration, validate_user_patch, UserError, CURRENT_USER_KEY, USERS_KEY,
};

/// Where the login page sends a user next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    Home,
    AdminPanel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub user: User,
    pub landing: Landing,
}

/// A row of the admin table. `index` is the user's position in the stored
/// collection, not in the filtered listing.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub index: usize,
    pub user: User,
}

/// Columns the admin table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Surname,
    Email,
    Role,
}

impl SortField {
    fn value<'a>(&self, user: &'a User) -> &'a str {
        match self {
            SortField::Name => &user.name,
            SortField::Surname => &user.surname,
            SortField::Email => &user.email,
            SortField::Role => user.role.as_str(),
        }
    }
}

impl FromStr for SortField {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortField::Name),
            "surname" => Ok(SortField::Surname),
            "email" => Ok(SortField::Email),
            "role" => Ok(SortField::Role),
            other => Err(UserError::UnknownSortField(other.to_string())),
        }
    }
}

fn compare_ignoring_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

fn check_patch(patch: &UserPatch) -> Result<(), UserError> {
    validate_user_patch(patch).map_err(|problems| {
        warn!(problems = problems.len(), "Edit rejected");
        UserError::ValidationError(problems)
    })
}

/// Client backing the registration, login and admin pages.
#[derive(Clone, Debug)]
pub struct UserClient {
    inner: Collections,
}

impl_client_new!(UserClient);

impl UserClient {
    /// Validates the form and appends a new user with the `user` role.
    ///
    /// Duplicate emails are accepted; login matches the first one.
    #[instrument(fields(user_email = %form.email), skip(self, form))]
    pub async fn register(&self, form: Registration) -> Result<User, UserError> {
        if let Err(problems) = validate_registration(&form) {
            warn!(problems = problems.len(), "Registration rejected");
            return Err(UserError::ValidationError(problems));
        }

        let user = User::new(form.name, form.surname, form.email, form.password, Role::User);
        self.inner.append(USERS_KEY, user.clone()).await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Finds the first user with matching credentials and records them as
    /// the current user.
    #[instrument(fields(user_email = %email), skip(self, email, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, UserError> {
        let found = self
            .inner
            .find_first(USERS_KEY, |u: &User| u.email == email && u.password == password)
            .await?;

        let Some(user) = found else {
            warn!("Login failed");
            return Err(UserError::InvalidCredentials);
        };

        self.inner.save_value(CURRENT_USER_KEY, &user).await?;

        let landing = if user.is_admin() {
            Landing::AdminPanel
        } else {
            Landing::Home
        };
        info!(user_id = %user.id, ?landing, "Login successful");
        Ok(LoginOutcome { user, landing })
    }

    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<Option<User>, UserError> {
        Ok(self.inner.load_value(CURRENT_USER_KEY).await?)
    }

    // -------------------------------------------------------------------------
    // Admin table
    // -------------------------------------------------------------------------

    /// Users whose name or email contains `query`, ignoring case.
    #[instrument(skip(self))]
    pub async fn list_users(&self, query: &str) -> Result<Vec<UserRow>, UserError> {
        let needle = query.to_lowercase();
        let users: Vec<User> = self.inner.load(USERS_KEY).await?;

        let rows: Vec<UserRow> = users
            .into_iter()
            .enumerate()
            .filter(|(_, user)| {
                user.name.to_lowercase().contains(&needle)
                    || user.email.to_lowercase().contains(&needle)
            })
            .map(|(index, user)| UserRow { index, user })
            .collect();

        debug!(rows = rows.len(), "Listed users");
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn users_snapshot(&self) -> Result<Snapshot<User>, UserError> {
        Ok(self.inner.snapshot(USERS_KEY).await?)
    }

    /// Applies an admin edit. Blank values are refused and nothing is written.
    #[instrument(skip(self, patch))]
    pub async fn edit_user(&self, index: usize, patch: UserPatch) -> Result<User, UserError> {
        check_patch(&patch)?;
        Ok(self.inner.replace_at::<User>(USERS_KEY, index, patch).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, index: usize) -> Result<User, UserError> {
        Ok(self.inner.remove_at::<User>(USERS_KEY, index).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_user_by_id(&self, id: &RecordId) -> Result<User, UserError> {
        Ok(self.inner.remove_by_id::<User>(USERS_KEY, id).await?)
    }

    /// Like [`UserClient::edit_user`], but refused if the table changed since
    /// `snapshot` was taken.
    #[instrument(skip(self, snapshot, patch))]
    pub async fn edit_user_checked(
        &self,
        snapshot: &Snapshot<User>,
        index: usize,
        patch: UserPatch,
    ) -> Result<User, UserError> {
        check_patch(&patch)?;
        Ok(self.inner.replace_at_checked(snapshot, index, patch).await?)
    }

    #[instrument(skip(self, snapshot))]
    pub async fn delete_user_checked(
        &self,
        snapshot: &Snapshot<User>,
        index: usize,
    ) -> Result<User, UserError> {
        Ok(self.inner.remove_at_checked(snapshot, index).await?)
    }

    /// Sorts the stored table ascending by `field` and persists the order.
    ///
    /// Comparison ignores case first; values equal up to case put lower case
    /// first. Full ties keep their previous relative order.
    #[instrument(skip(self))]
    pub async fn sort_users(&self, field: SortField) -> Result<Vec<User>, UserError> {
        let sorted = self
            .inner
            .mutate(USERS_KEY, |users: &mut Vec<User>| {
                users.sort_by(|a, b| compare_ignoring_case(field.value(a), field.value(b)));
                Ok(users.clone())
            })
            .await?;

        info!(count = sorted.len(), "Users sorted");
        Ok(sorted)
    }
}
