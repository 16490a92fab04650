/// Partial self-service update.
///
/// `None` fields are left untouched; an empty `password` also means
/// "keep the current password".
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub user_id: Option<i64>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserDto {
    /// The new plaintext password, if one was actually supplied.
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}
