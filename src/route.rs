use std::fmt;
use url::Url;

use crate::course::CourseId;
use crate::error::Result;

// Paths are app-relative; the url crate needs an absolute base to parse them.
const APP_ORIGIN: &str = "app://coursebow";

pub const CHECKOUT_INITIAL_STEP: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    Search {
        id: Option<CourseId>,
    },
    Checkout {
        step: u32,
        id: CourseId,
        show_sign_up: bool,
    },
    NotFound {
        path: String,
    },
}

impl Route {
    pub fn search(id: Option<CourseId>) -> Self {
        Self::Search { id }
    }

    pub fn checkout(id: CourseId) -> Self {
        Self::Checkout {
            step: CHECKOUT_INITIAL_STEP,
            id,
            show_sign_up: false,
        }
    }

    pub fn parse(path: &str) -> Result<Self> {
        let url = resolve(path)?;
        let param = |name: &str| {
            url.query_pairs()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned())
        };

        let route = match url.path().trim_end_matches('/') {
            "" | "/landing" => Self::Landing,
            "/search" => Self::Search {
                id: param("id").filter(|id| !id.is_empty()).map(CourseId::new),
            },
            "/checkout" => match param("id").filter(|id| !id.is_empty()) {
                Some(id) => Self::Checkout {
                    step: param("step")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(CHECKOUT_INITIAL_STEP),
                    id: CourseId::new(id),
                    show_sign_up: param("showSignUp").map_or(false, |v| v == "true"),
                },
                None => Self::NotFound {
                    path: path.to_string(),
                },
            },
            _ => Self::NotFound {
                path: path.to_string(),
            },
        };
        Ok(route)
    }

    pub fn to_path(&self) -> String {
        match self {
            Self::Landing => "/".to_string(),
            Self::Search { id: None } => "/search".to_string(),
            Self::Search { id: Some(id) } => with_query("/search", &[("id", id.as_str())]),
            Self::Checkout {
                step,
                id,
                show_sign_up,
            } => {
                let step = step.to_string();
                with_query(
                    "/checkout",
                    &[
                        ("step", step.as_str()),
                        ("id", id.as_str()),
                        ("showSignUp", if *show_sign_up { "true" } else { "false" }),
                    ],
                )
            }
            Self::NotFound { path } => path.clone(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Landing => "Courses",
            Self::Search { .. } => "Search",
            Self::Checkout { .. } => "Checkout",
            Self::NotFound { .. } => "Not Found",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

/// Reads a single query parameter from an app path.
pub fn read_param(path: &str, name: &str) -> Option<String> {
    let url = resolve(path).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

fn resolve(path: &str) -> Result<Url> {
    let trimmed = path.trim();
    let normalized = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };
    Ok(Url::parse(APP_ORIGIN)?.join(&normalized)?)
}

fn with_query(path: &str, pairs: &[(&str, &str)]) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter())
        .finish();
    format!("{}?{}", path, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_checkout_handoff_url() {
        let route = Route::checkout(CourseId::new("b"));
        assert_eq!(route.to_path(), "/checkout?step=1&id=b&showSignUp=false");
    }

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/").unwrap(), Route::Landing);
        assert_eq!(Route::parse("landing").unwrap(), Route::Landing);
        assert_eq!(Route::parse("/search").unwrap(), Route::search(None));
        assert_eq!(
            Route::parse("/search?id=c").unwrap(),
            Route::search(Some(CourseId::new("c")))
        );
        assert_eq!(
            Route::parse("/checkout?step=2&id=x&showSignUp=true").unwrap(),
            Route::Checkout {
                step: 2,
                id: CourseId::new("x"),
                show_sign_up: true
            }
        );
    }

    #[test]
    fn empty_id_is_treated_as_absent() {
        assert_eq!(Route::parse("/search?id=").unwrap(), Route::search(None));
    }

    #[test]
    fn unknown_path_and_checkout_without_id_are_not_found() {
        assert!(matches!(
            Route::parse("/dashboard").unwrap(),
            Route::NotFound { .. }
        ));
        assert!(matches!(
            Route::parse("/checkout?step=1").unwrap(),
            Route::NotFound { .. }
        ));
    }

    #[test]
    fn ids_with_reserved_characters_survive_encoding() {
        let id = CourseId::new("a&b=c d");
        let path = Route::search(Some(id.clone())).to_path();
        assert_eq!(read_param(&path, "id").as_deref(), Some(id.as_str()));
        assert_eq!(Route::parse(&path).unwrap(), Route::search(Some(id)));
    }
}
