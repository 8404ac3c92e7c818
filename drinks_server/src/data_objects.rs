use serde::{Deserialize, Serialize};

/// Response body for every operation that returns drinks. Single-drink operations return a one-element list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self { success: true, drinks }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub deleted: i64,
}

impl DeletedResponse {
    pub fn new(deleted: i64) -> Self {
        Self { success: true, deleted }
    }
}
