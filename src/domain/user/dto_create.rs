/// A new user as handed to the store. The password is already hashed; the
/// store assigns the id.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub name: String,
    pub username: String,
    pub password_hash: String,
}
