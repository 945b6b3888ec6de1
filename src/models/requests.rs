//! Request DTOs for the gateway API
//!
//! Defines the structure of incoming query strings. Write bodies reuse the
//! remote API request types.

use serde::Deserialize;

fn default_pagina() -> u32 {
    1
}

fn default_tamano_pagina() -> u32 {
    10
}

/// Query string of `GET /convenios`
///
/// # Fields
/// - `pagina`: 1-based page number (default 1)
/// - `tamano_pagina`: page size (default 10)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_pagina")]
    pub pagina: u32,
    #[serde(default = "default_tamano_pagina")]
    pub tamano_pagina: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            pagina: default_pagina(),
            tamano_pagina: default_tamano_pagina(),
        }
    }
}

impl ListQuery {
    /// Validates the query
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.pagina == 0 {
            return Some("pagina must be at least 1".to_string());
        }
        if self.tamano_pagina == 0 {
            return Some("tamano_pagina must be at least 1".to_string());
        }
        None
    }
}
