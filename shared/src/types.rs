use serde::{Deserialize, Deserializer, Serialize};

// ========== USER ==========
/// A user record as stored in the table and sent over the wire.
///
/// Missing and null fields decode to their zero value, so `{}` is a valid
/// body and items holding `NULL` attributes still load.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Person {
    #[serde(deserialize_with = "null_as_default")]
    pub user_id: String, // partition key, assigned server side
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub age: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub courses: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Body returned by create: only the assigned id.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CreateUserResponse {
    pub user_id: String,
}

impl From<&Person> for CreateUserResponse {
    fn from(person: &Person) -> Self {
        Self {
            user_id: person.user_id.clone(),
        }
    }
}
