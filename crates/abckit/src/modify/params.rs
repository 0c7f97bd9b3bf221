//! Parameter aggregates for structural modify operations
//!
//! Each aggregate is validated against the target file before anything is
//! changed.

use crate::file::File;
use crate::metadata::{AnnotationInterfaceRef, TypeRef, ValueRef};
use crate::status::{KitError, KitResult};

fn require_name(name: &str, what: &str) -> KitResult<()> {
    if name.is_empty() {
        Err(KitError::bad_argument(format!("{} name is empty", what)))
    } else {
        Ok(())
    }
}

/// Import of `name` from another module, bound locally as `alias`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFromDynamicModuleParams {
    pub name: String,
    pub alias: String,
}

impl ImportFromDynamicModuleParams {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
        }
    }

    pub(crate) fn validate(&self, _file: &File) -> KitResult<()> {
        require_name(&self.name, "import")?;
        require_name(&self.alias, "import alias")
    }
}

/// Export of `name` under `alias`; an empty alias exports under `name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicModuleExportParams {
    pub name: String,
    pub alias: Option<String>,
}

impl DynamicModuleExportParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub(crate) fn validate(&self, _file: &File) -> KitResult<()> {
        require_name(&self.name, "export")?;
        match &self.alias {
            Some(alias) => require_name(alias, "export alias"),
            None => Ok(()),
        }
    }

    pub(crate) fn effective_alias(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalModuleParams {
    pub name: String,
}

impl ExternalModuleParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub(crate) fn validate(&self, file: &File) -> KitResult<()> {
        require_name(&self.name, "module")?;
        let taken = file
            .modules
            .iter()
            .any(|(_, m)| file.strings.get(m.name.index) == Some(self.name.as_str()));
        if taken {
            return Err(KitError::bad_argument(format!(
                "module {} already exists",
                self.name
            )));
        }
        Ok(())
    }
}

/// Annotation instance of `interface`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationParams {
    pub interface: AnnotationInterfaceRef,
}

impl AnnotationParams {
    pub(crate) fn validate(&self, file: &File) -> KitResult<()> {
        file.annotation_interface(self.interface).map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationElementParams {
    pub name: String,
    pub value: ValueRef,
}

impl AnnotationElementParams {
    pub(crate) fn validate(&self, file: &File) -> KitResult<()> {
        require_name(&self.name, "annotation element")?;
        file.value(self.value).map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationInterfaceParams {
    pub name: String,
}

impl AnnotationInterfaceParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub(crate) fn validate(&self, _file: &File) -> KitResult<()> {
        require_name(&self.name, "annotation interface")
    }
}

/// Field of an annotation interface
///
/// A default value must have the field's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationInterfaceFieldParams {
    pub name: String,
    pub ty: TypeRef,
    pub default_value: Option<ValueRef>,
}

impl AnnotationInterfaceFieldParams {
    pub(crate) fn validate(&self, file: &File) -> KitResult<()> {
        require_name(&self.name, "annotation interface field")?;
        let field_type = file.type_data(self.ty)?.id;
        if let Some(value) = self.default_value {
            let value_type = file.type_data(file.value(value)?.ty)?.id;
            if value_type != field_type {
                return Err(KitError::bad_argument(format!(
                    "default value of type {:?} for a field of type {:?}",
                    value_type, field_type
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KitConfig;
    use crate::metadata::TypeId;
    use crate::status::Status;
    use crate::target::Mode;

    #[test]
    fn test_empty_names_are_rejected() {
        let file = File::empty(Mode::Dynamic, KitConfig::default());
        let params = ImportFromDynamicModuleParams::new("", "a");
        assert_eq!(params.validate(&file).unwrap_err().status(), Status::BadArgument);
        let params = DynamicModuleExportParams::new("x").with_alias("");
        assert_eq!(params.validate(&file).unwrap_err().status(), Status::BadArgument);
        assert_eq!(DynamicModuleExportParams::new("x").effective_alias(), "x");
    }

    #[test]
    fn test_field_default_must_match_type() {
        let mut file = File::empty(Mode::Static, KitConfig::default());
        let ty = file.create_type(TypeId::F64).unwrap();
        let flag = file.create_value_u1(true);
        let number = file.create_value_double(1.5);
        let mut params = AnnotationInterfaceFieldParams {
            name: "weight".into(),
            ty,
            default_value: Some(flag),
        };
        assert_eq!(params.validate(&file).unwrap_err().status(), Status::BadArgument);
        params.default_value = Some(number);
        assert!(params.validate(&file).is_ok());
    }
}
