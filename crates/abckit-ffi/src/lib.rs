//! C ABI for abckit
//!
//! The API is exposed as versioned tables of function pointers, obtained
//! through the `AbckitGet*ApiImpl(version)` entry points. The conventions:
//! - Entity handles are opaque pointers owned by their file and freed by
//!   `close_file`; the same entity always maps to the same pointer
//! - Graphs are owned by the caller and freed with `destroy_graph`
//! - Errors are reported through a thread-local last-error register, read
//!   with `get_last_error` right after the call that set it
//! - A file is single-writer; callers serialize access per file
//! - Tables are append-only across API versions

mod error;
mod extensions;
mod graph;
mod handles;
mod inspect;
mod isa;
mod modify;

pub use extensions::{
    AbckitArktsAnnotationCreateParams, AbckitArktsAnnotationElementCreateParams,
    AbckitArktsAnnotationInterfaceCreateParams, AbckitArktsAnnotationInterfaceFieldCreateParams,
    AbckitArktsModifyApi, AbckitDynamicModuleExportCreateParams, AbckitExternalModuleCreateParams,
    AbckitImportFromDynamicModuleCreateParams, AbckitJsModifyApi,
};
pub use graph::{AbckitGraphApi, GraphVisitor};
pub use handles::{
    AbckitBasicBlock, AbckitCoreAnnotation, AbckitCoreAnnotationElement,
    AbckitCoreAnnotationInterface, AbckitCoreAnnotationInterfaceField, AbckitCoreClass,
    AbckitCoreExportDescriptor, AbckitCoreFunction, AbckitCoreImportDescriptor, AbckitCoreModule,
    AbckitCoreNamespace, AbckitFile, AbckitGraph, AbckitInst, AbckitLiteral, AbckitLiteralArray,
    AbckitString, AbckitType, AbckitValue,
};
pub use inspect::{AbckitInspectApi, Visitor};
pub use isa::{AbckitIsaApiDynamic, AbckitIsaApiStatic};
pub use modify::AbckitModifyApi;

use abckit::{ApiVersion, File, KitConfig, KitError, KitResult, Status};
use error::{entry, finish, last_error, set_last_error};
use handles::{file_handle, text, FileHandle, GraphHandle};
use once_cell::sync::Lazy;
use std::ffi::CStr;
use std::os::raw::c_char;
use std::sync::RwLock;

/// Configuration applied to files opened through the C ABI
static CONFIG: Lazy<RwLock<KitConfig>> = Lazy::new(|| RwLock::new(KitConfig::default()));

fn current_config() -> KitConfig {
    match CONFIG.read() {
        Ok(config) => config.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

// ============================================================================
// Core API
// ============================================================================

/// File lifecycle and the last-error register
#[repr(C)]
pub struct AbckitApi {
    pub get_last_error: unsafe extern "C" fn() -> Status,
    pub open_abc: unsafe extern "C" fn(*const c_char, usize) -> *mut AbckitFile,
    pub open_abc_dynamic: unsafe extern "C" fn(*const c_char, usize) -> *mut AbckitFile,
    pub open_abc_static: unsafe extern "C" fn(*const c_char, usize) -> *mut AbckitFile,
    pub write_abc: unsafe extern "C" fn(*mut AbckitFile, *const c_char, usize),
    pub close_file: unsafe extern "C" fn(*mut AbckitFile),
    pub destroy_graph: unsafe extern "C" fn(*mut AbckitGraph),
}

unsafe extern "C" fn get_last_error() -> Status {
    last_error()
}

unsafe fn open_with(path: *const c_char, len: usize, open: fn(&str) -> KitResult<File>) -> KitResult<*mut AbckitFile> {
    let path = text(path, len)?;
    let file = open(path)?;
    Ok(Box::into_raw(FileHandle::new(file)).cast())
}

entry! {
    fn open_abc(path: *const c_char, len: usize) -> *mut AbckitFile {
        open_with(path, len, |path| File::open_with_config(path, &current_config()))
    }

    fn open_abc_dynamic(path: *const c_char, len: usize) -> *mut AbckitFile {
        open_with(path, len, |path| {
            let file = File::open_with_config(path, &current_config())?;
            file.mode().expect(abckit::Mode::Dynamic, "openAbcDynamic")?;
            Ok(file)
        })
    }

    fn open_abc_static(path: *const c_char, len: usize) -> *mut AbckitFile {
        open_with(path, len, |path| {
            let file = File::open_with_config(path, &current_config())?;
            file.mode().expect(abckit::Mode::Static, "openAbcStatic")?;
            Ok(file)
        })
    }

    fn write_abc(file: *mut AbckitFile, path: *const c_char, len: usize) -> () {
        let handle = file_handle(file)?;
        handle.file.write(text(path, len)?)
    }
}

/// Close a file and free every entity pointer handed out for it
unsafe extern "C" fn close_file(file: *mut AbckitFile) {
    if file.is_null() {
        set_last_error(Status::BadArgument);
        return;
    }
    let handle = Box::from_raw(file.cast::<FileHandle>());
    handle.mark_closed();
    handle.file.close();
    set_last_error(Status::NoError);
}

/// Free a graph and its block and instruction pointers
///
/// Also valid after the graph's file has been closed.
unsafe extern "C" fn destroy_graph(graph: *mut AbckitGraph) {
    let result = if graph.is_null() {
        Err(handles::null_argument("graph"))
    } else {
        Ok(())
    };
    if result.is_ok() {
        let handle = Box::from_raw(graph.cast::<GraphHandle>());
        tracing::trace!(target: "abckit::ir", graph = %handle.graph.id(), "destroyed graph");
    }
    finish("destroy_graph", result)
}

static API_V1: AbckitApi = AbckitApi {
    get_last_error,
    open_abc,
    open_abc_dynamic,
    open_abc_static,
    write_abc,
    close_file,
    destroy_graph,
};

// ============================================================================
// Table lookup
// ============================================================================

macro_rules! table_getters {
    ($($(#[$meta:meta])* $name:ident -> $table:ty = $v1:path;)*) => {
        $(
            $(#[$meta])*
            ///
            /// # Returns
            /// * The table for `version`
            /// * NULL with `UNKNOWN_API_VERSION` for an unknown version
            #[no_mangle]
            #[allow(non_snake_case)]
            pub extern "C" fn $name(version: u32) -> *const $table {
                let result = ApiVersion::from_raw(version).map(|version| match version {
                    ApiVersion::Release1_0_0 => &$v1 as *const $table,
                });
                finish(stringify!($name), result)
            }
        )*
    };
}

table_getters! {
    /// Core API table
    AbckitGetApiImpl -> AbckitApi = API_V1;
    /// Inspect API table
    AbckitGetInspectApiImpl -> AbckitInspectApi = inspect::INSPECT_API_V1;
    /// Modify API table
    AbckitGetModifyApiImpl -> AbckitModifyApi = modify::MODIFY_API_V1;
    /// Graph API table
    AbckitGetGraphApiImpl -> AbckitGraphApi = graph::GRAPH_API_V1;
    /// Dynamic instruction builders
    AbckitGetIsaApiDynamicImpl -> AbckitIsaApiDynamic = isa::ISA_DYNAMIC_V1;
    /// Static instruction builders
    AbckitGetIsaApiStaticImpl -> AbckitIsaApiStatic = isa::ISA_STATIC_V1;
    /// ArkTS extension operations
    AbckitGetArktsModifyApiImpl -> AbckitArktsModifyApi = extensions::ARKTS_MODIFY_API_V1;
    /// JS extension operations
    AbckitGetJsModifyApiImpl -> AbckitJsModifyApi = extensions::JS_MODIFY_API_V1;
}

/// Apply a TOML configuration and install logging
///
/// # Arguments
/// * `toml` - Null-terminated configuration text
///
/// # Returns
/// * true on success
/// * false on failure (`BAD_ARGUMENT` for null or invalid text)
///
/// # Safety
/// `toml` must be NULL or a valid null-terminated string
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn AbckitConfigure(toml: *const c_char) -> bool {
    let result = (|| -> KitResult<bool> {
        if toml.is_null() {
            return Err(handles::null_argument("configuration"));
        }
        let text = CStr::from_ptr(toml)
            .to_str()
            .map_err(|_| KitError::BadArgument("configuration is not UTF-8".to_string()))?;
        let config = KitConfig::from_toml_str(text).map_err(|e| KitError::BadArgument(e.to_string()))?;
        abckit::logging::init(&config.log).map_err(|e| KitError::BadArgument(e.to_string()))?;
        match CONFIG.write() {
            Ok(mut slot) => *slot = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }
        Ok(true)
    })();
    finish("AbckitConfigure", result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_version() {
        assert!(AbckitGetInspectApiImpl(99).is_null());
        assert_eq!(last_error(), Status::UnknownApiVersion);
        assert!(!AbckitGetInspectApiImpl(0).is_null());
        assert_eq!(last_error(), Status::NoError);
    }
}
