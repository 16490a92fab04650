/// Administrative full update: name and username are always overwritten.
#[derive(Debug, Clone)]
pub struct ReplaceUserDto {
    pub name: String,
    pub username: String,
    pub password: Option<String>,
}
