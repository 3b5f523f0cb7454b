use serde::Deserialize;

/// One page of a paginated listing. `next` is absent on the last page.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub values: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
}
