//! Template storage.
//!
//! # Lookup order
//!
//! ```text
//! --template <path>                 explicit override
//! <exe_dir>/cloudformation.yml      shipped next to the binary
//! built-in                          bundled copy of the same template
//! ```
//!
//! The body is read once and submitted verbatim; parsing is only a sanity
//! check that the document is a mapping with `Resources`.

use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::error::TemplateError;

/// File name looked up next to the executable.
pub const TEMPLATE_FILE_NAME: &str = "cloudformation.yml";

const BUILTIN_BODY: &str = include_str!("../templates/cloudformation.yml");
const BUILTIN_ORIGIN: &str = "<built-in>";

/// An immutable template document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    body: String,
    origin: PathBuf,
}

impl Template {
    /// Read and validate the template at `path`.
    pub fn load_at(path: &Path) -> Result<Self, TemplateError> {
        let body = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_body(body, path)
    }

    /// Validate an in-memory body. `origin` is only used in messages.
    pub fn from_body(body: impl Into<String>, origin: &Path) -> Result<Self, TemplateError> {
        let body = body.into();
        validate(&body, origin)?;
        Ok(Self {
            body,
            origin: origin.to_path_buf(),
        })
    }

    /// The bundled OIDC role template.
    pub fn builtin() -> Self {
        Self {
            body: BUILTIN_BODY.to_owned(),
            origin: PathBuf::from(BUILTIN_ORIGIN),
        }
    }

    /// `<exe_dir>/cloudformation.yml` if it exists.
    pub fn locate(exe_dir: &Path) -> Option<PathBuf> {
        let candidate = exe_dir.join(TEMPLATE_FILE_NAME);
        candidate.is_file().then_some(candidate)
    }

    /// Resolve using the lookup order above.
    pub fn resolve_at(
        explicit: Option<&Path>,
        exe_dir: Option<&Path>,
    ) -> Result<Self, TemplateError> {
        if let Some(path) = explicit {
            return Self::load_at(path);
        }
        match exe_dir.and_then(Self::locate) {
            Some(path) => Self::load_at(&path),
            None => Ok(Self::builtin()),
        }
    }

    /// `resolve_at` using the directory of the running executable.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, TemplateError> {
        let exe = std::env::current_exe().ok();
        let exe_dir = exe.as_deref().and_then(Path::parent);
        Self::resolve_at(explicit, exe_dir)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn is_builtin(&self) -> bool {
        self.origin == Path::new(BUILTIN_ORIGIN)
    }
}

fn validate(body: &str, origin: &Path) -> Result<(), TemplateError> {
    let doc: Value = serde_yaml::from_str(body).map_err(|source| TemplateError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;
    let Value::Mapping(map) = doc else {
        return Err(TemplateError::NotAMapping {
            path: origin.to_path_buf(),
        });
    };
    if !map.contains_key("Resources") {
        return Err(TemplateError::MissingResources {
            path: origin.to_path_buf(),
        });
    }
    Ok(())
}
