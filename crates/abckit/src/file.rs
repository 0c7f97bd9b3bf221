//! Files: the root owner of every entity
//!
//! A [`File`] is created by opening a container (or by
//! [`FileBuilder`](crate::builder::FileBuilder)) and releases everything it
//! owns when dropped or closed.

use crate::codec::container;
use crate::config::KitConfig;
use crate::metadata::arena::Arena;
use crate::metadata::entities::{
    AnnotationData, AnnotationElementData, AnnotationInterfaceData, AnnotationInterfaceFieldData,
    ClassData, ExportData, FunctionData, ImportData, ModuleData, NamespaceData,
};
use crate::metadata::literal::{LiteralArrayData, LiteralData};
use crate::metadata::strings::StringPool;
use crate::metadata::types::{TypeData, ValueData};
use crate::metadata::{
    AnnotationElementRef, AnnotationInterfaceFieldRef, AnnotationInterfaceRef, AnnotationRef,
    ClassRef, ExportRef, FileId, FunctionRef, ImportRef, LiteralArrayRef, LiteralRef, ModuleRef,
    NamespaceRef, StringRef, TypeRef, ValueRef,
};
use crate::status::{KitError, KitResult};
use crate::target::Mode;
use crate::version::FileVersion;
use std::path::Path;

/// An open bytecode file
#[derive(Debug)]
pub struct File {
    pub(crate) id: FileId,
    pub(crate) mode: Mode,
    pub(crate) version: FileVersion,
    pub(crate) config: KitConfig,
    pub(crate) strings: StringPool,
    pub(crate) literals: Arena<LiteralData>,
    pub(crate) literal_arrays: Arena<LiteralArrayData>,
    pub(crate) types: Arena<TypeData>,
    pub(crate) values: Arena<ValueData>,
    pub(crate) modules: Arena<ModuleData>,
    pub(crate) namespaces: Arena<NamespaceData>,
    pub(crate) classes: Arena<ClassData>,
    pub(crate) functions: Arena<FunctionData>,
    pub(crate) imports: Arena<ImportData>,
    pub(crate) exports: Arena<ExportData>,
    pub(crate) annotation_interfaces: Arena<AnnotationInterfaceData>,
    pub(crate) annotation_interface_fields: Arena<AnnotationInterfaceFieldData>,
    pub(crate) annotations: Arena<AnnotationData>,
    pub(crate) annotation_elements: Arena<AnnotationElementData>,
}

impl File {
    /// Create an empty file
    pub(crate) fn empty(mode: Mode, config: KitConfig) -> Self {
        Self {
            id: FileId::fresh(),
            mode,
            version: FileVersion::CURRENT,
            config,
            strings: StringPool::new(),
            literals: Arena::new(),
            literal_arrays: Arena::new(),
            types: Arena::new(),
            values: Arena::new(),
            modules: Arena::new(),
            namespaces: Arena::new(),
            classes: Arena::new(),
            functions: Arena::new(),
            imports: Arena::new(),
            exports: Arena::new(),
            annotation_interfaces: Arena::new(),
            annotation_interface_fields: Arena::new(),
            annotations: Arena::new(),
            annotation_elements: Arena::new(),
        }
    }

    /// Open a container of either mode
    pub fn open(path: impl AsRef<Path>) -> KitResult<Self> {
        Self::open_with_config(path, &KitConfig::default())
    }

    /// Open a container with explicit configuration
    pub fn open_with_config(path: impl AsRef<Path>, config: &KitConfig) -> KitResult<Self> {
        let path = path.as_ref();
        tracing::debug!(target: "abckit::file", path = %path.display(), "opening file");
        let bytes = std::fs::read(path)?;
        let file = container::decode(&bytes, config)?;
        tracing::debug!(
            target: "abckit::file",
            id = %file.id,
            mode = %file.mode,
            modules = file.modules.len(),
            "opened file"
        );
        Ok(file)
    }

    /// Open a container that must hold dynamic modules
    pub fn open_dynamic(path: impl AsRef<Path>) -> KitResult<Self> {
        let file = Self::open(path)?;
        file.mode.expect(Mode::Dynamic, "openAbcDynamic")?;
        Ok(file)
    }

    /// Open a container that must hold static modules
    pub fn open_static(path: impl AsRef<Path>) -> KitResult<Self> {
        let file = Self::open(path)?;
        file.mode.expect(Mode::Static, "openAbcStatic")?;
        Ok(file)
    }

    /// Decode a container from memory
    pub fn from_bytes(bytes: &[u8]) -> KitResult<Self> {
        container::decode(bytes, &KitConfig::default())
    }

    /// Encode the file into container bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        container::encode(self)
    }

    /// Write the file to `path`
    pub fn write(&self, path: impl AsRef<Path>) -> KitResult<()> {
        let path = path.as_ref();
        tracing::debug!(target: "abckit::file", id = %self.id, path = %path.display(), "writing file");
        std::fs::write(path, self.to_bytes())?;
        Ok(())
    }

    /// Release the file and everything it owns
    pub fn close(self) {
        tracing::debug!(target: "abckit::file", id = %self.id, "closing file");
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &KitConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: KitConfig) {
        self.config = config;
    }

    /// Version tag of the container
    pub fn version(&self) -> FileVersion {
        self.version
    }

    /// Intern a string in this file
    pub fn create_string(&mut self, value: &str) -> StringRef {
        StringRef::new(self.id, self.strings.intern(value))
    }

    /// Text of a string handle
    pub fn string_to_str(&self, string: StringRef) -> KitResult<&str> {
        self.check_ctx(string.file, StringRef::KIND)?;
        self.strings
            .get(string.index)
            .ok_or_else(|| KitError::bad_argument(format!("string handle {} is stale", string.index)))
    }

    /// Owned copy of a string handle's text
    pub fn string_to_string(&self, string: StringRef) -> KitResult<String> {
        self.string_to_str(string).map(str::to_owned)
    }

    pub(crate) fn check_ctx(&self, file: FileId, what: &str) -> KitResult<()> {
        if file == self.id {
            Ok(())
        } else {
            tracing::warn!(target: "abckit::dispatch", expected = %self.id, actual = %file, what, "handle from another file");
            Err(KitError::WrongCtx(format!(
                "{} belongs to {}, not {}",
                what, file, self.id
            )))
        }
    }
}

macro_rules! resolvers {
    ($($get:ident, $get_mut:ident, $field:ident, $handle:ty, $data:ty;)*) => {
        impl File {
            $(
                pub(crate) fn $get(&self, handle: $handle) -> KitResult<&$data> {
                    self.check_ctx(handle.file, <$handle>::KIND)?;
                    self.$field.get(handle.index).ok_or_else(|| {
                        KitError::bad_argument(format!(
                            "{} handle {} is stale",
                            <$handle>::KIND,
                            handle.index
                        ))
                    })
                }

                #[allow(dead_code)]
                pub(crate) fn $get_mut(&mut self, handle: $handle) -> KitResult<&mut $data> {
                    self.check_ctx(handle.file, <$handle>::KIND)?;
                    self.$field.get_mut(handle.index).ok_or_else(|| {
                        KitError::bad_argument(format!(
                            "{} handle {} is stale",
                            <$handle>::KIND,
                            handle.index
                        ))
                    })
                }
            )*
        }
    };
}

resolvers! {
    module, module_mut, modules, ModuleRef, ModuleData;
    namespace, namespace_mut, namespaces, NamespaceRef, NamespaceData;
    class, class_mut, classes, ClassRef, ClassData;
    function, function_mut, functions, FunctionRef, FunctionData;
    import, import_mut, imports, ImportRef, ImportData;
    export, export_mut, exports, ExportRef, ExportData;
    annotation_interface, annotation_interface_mut, annotation_interfaces, AnnotationInterfaceRef, AnnotationInterfaceData;
    annotation_interface_field, annotation_interface_field_mut, annotation_interface_fields, AnnotationInterfaceFieldRef, AnnotationInterfaceFieldData;
    annotation, annotation_mut, annotations, AnnotationRef, AnnotationData;
    annotation_element, annotation_element_mut, annotation_elements, AnnotationElementRef, AnnotationElementData;
    literal, literal_mut, literals, LiteralRef, LiteralData;
    literal_array, literal_array_mut, literal_arrays, LiteralArrayRef, LiteralArrayData;
    type_data, type_data_mut, types, TypeRef, TypeData;
    value, value_mut, values, ValueRef, ValueData;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    #[test]
    fn test_strings_are_file_scoped() {
        let mut a = File::empty(Mode::Dynamic, KitConfig::default());
        let b = File::empty(Mode::Dynamic, KitConfig::default());
        let s = a.create_string("hello");
        assert_eq!(a.string_to_str(s).unwrap(), "hello");
        assert_eq!(b.string_to_str(s).unwrap_err().status(), Status::WrongCtx);
    }

    #[test]
    fn test_stale_handle() {
        let file = File::empty(Mode::Static, KitConfig::default());
        let bogus = ModuleRef::new(file.id(), 12);
        assert_eq!(file.module(bogus).unwrap_err().status(), Status::BadArgument);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = File::open(dir.path().join("missing.abc")).unwrap_err();
        assert_eq!(err.status(), Status::IoError);
    }
}
