use crate::collection::{Record, RecordId};
use crate::domain::{User, UserPatch};

impl Record for User {
    type Patch = UserPatch;

    fn id(&self) -> &RecordId {
        &self.id
    }

    /// Updates the user's profile information.
    ///
    /// Role and password are not editable through a patch.
    fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(surname) = patch.surname {
            self.surname = surname;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
    }

    /// The email is the login key, so a user without one is unusable.
    fn validate(&self) -> Result<(), String> {
        if self.email.trim().is_empty() {
            return Err("email is required".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    #[test]
    fn test_patch_keeps_absent_fields() {
        let mut user = User::new("Ana", "Li", "a@x.com", "Pass1234", Role::User);
        let id = user.id.clone();

        user.apply_patch(UserPatch {
            surname: Some("Lee".to_string()),
            ..UserPatch::default()
        });

        assert_eq!(user.id, id);
        assert_eq!(user.name, "Ana");
        assert_eq!(user.surname, "Lee");
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.password, "Pass1234");
    }

    #[test]
    fn test_decodes_stored_shape() {
        let text = r#"{"id":"u-1","name":"Root","surname":"Admin","email":"root@x.com","password":"Secret99","role":"admin"}"#;
        let user: User = serde_json::from_str(text).unwrap();

        assert_eq!(user.id, RecordId::from("u-1"));
        assert!(user.is_admin());
        assert!(user.validate().is_ok());

        let blank = User::new("A", "B", " ", "Pass1234", Role::User);
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let text = r#"{"id":"u-1","name":"A","surname":"B","email":"a@x.com","password":"p","role":"owner"}"#;
        assert!(serde_json::from_str::<User>(text).is_err());
    }
}
