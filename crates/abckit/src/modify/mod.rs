//! Modify API
//!
//! Mutating operations on a [`File`]. Every operation validates all of its
//! arguments before it touches the file, so a failed call leaves the file
//! unchanged. Handles to removed entities become stale and are rejected
//! with `BadArgument` afterwards.

mod arkts;
mod js;
mod literal;
pub mod params;
mod value;

use crate::file::File;
use crate::ir::body;
use crate::ir::graph::Graph;
use crate::ir::opcode::Payload;
use crate::ir::verify::verify_graph;
use crate::metadata::entities::{ExportData, ImportData, ModuleData};
use crate::metadata::{ExportRef, FunctionRef, ImportRef, ModuleRef};
use crate::status::{KitError, KitResult};
use crate::target::Target;
use params::{DynamicModuleExportParams, ExternalModuleParams, ImportFromDynamicModuleParams};

impl File {
    /// Replace the body of `function` with `graph`
    ///
    /// The graph is verified (unless `graph.verify_on_set` is off),
    /// encoded into the function body and kept as the function's attached
    /// graph. The previously attached graph is released.
    pub fn function_set_graph(&mut self, function: FunctionRef, graph: &Graph) -> KitResult<()> {
        tracing::debug!(target: "abckit::modify", function = function.index, graph = %graph.id(), "functionSetGraph");
        self.check_ctx(graph.file_id(), "graph")?;
        self.function(function)?;
        let mode = self.dispatch_function(function, "functionSetGraph")?;
        graph.mode().expect(mode, "functionSetGraph")?;

        if self.config.graph.verify_on_set {
            verify_graph(graph).map_err(|err| {
                tracing::warn!(target: "abckit::modify", %err, "rejected graph");
                KitError::bad_argument(err.to_string())
            })?;
        }
        self.check_graph_operands(graph)?;
        let encoded = body::encode(graph)?;

        let mut attached = graph.fork();
        attached.function = function;
        let data = self.function_mut(function)?;
        data.body = encoded;
        if let Some(previous) = data.attached.replace(Box::new(attached)) {
            tracing::trace!(target: "abckit::modify", graph = %previous.id(), "released previous graph");
        }
        Ok(())
    }

    /// Whether a body of a function in `module` refers to `operand`
    pub(crate) fn operand_in_use(&self, module: ModuleRef, operand: Payload) -> KitResult<bool> {
        for (index, data) in self.functions.iter() {
            if data.module != module {
                continue;
            }
            let decoded;
            let graph: &Graph = match &data.attached {
                Some(graph) => graph,
                None => {
                    decoded = body::decode(&data.body, self, FunctionRef::new(self.id, index))?;
                    &decoded
                }
            };
            let used = graph
                .attached_insts()
                .any(|i| graph.insts[i as usize].payload == Some(operand));
            if used {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub(crate) fn insert_import(
        &mut self,
        importing: ModuleRef,
        imported: ModuleRef,
        params: &ImportFromDynamicModuleParams,
    ) -> KitResult<ImportRef> {
        params.validate(self)?;
        let name = self.create_string(&params.name);
        let alias = self.create_string(&params.alias);
        let index = self.imports.push(ImportData {
            module: importing,
            imported,
            name,
            alias,
        });
        let import = ImportRef::new(self.id, index);
        self.module_mut(importing)?.imports.push(import);
        tracing::trace!(target: "abckit::modify", import = index, "added import descriptor");
        Ok(import)
    }

    pub(crate) fn insert_export(
        &mut self,
        exporting: ModuleRef,
        exported: ModuleRef,
        params: &DynamicModuleExportParams,
    ) -> KitResult<ExportRef> {
        params.validate(self)?;
        let name = self.create_string(&params.name);
        let alias = self.create_string(params.effective_alias());
        let index = self.exports.push(ExportData {
            module: exporting,
            exported,
            name,
            alias,
        });
        let export = ExportRef::new(self.id, index);
        self.module_mut(exporting)?.exports.push(export);
        tracing::trace!(target: "abckit::modify", export = index, "added export descriptor");
        Ok(export)
    }

    /// Drop `import` from `module`; it must belong there and be unused
    pub(crate) fn detach_import(&mut self, module: ModuleRef, import: ImportRef) -> KitResult<()> {
        if self.import(import)?.module != module {
            return Err(KitError::bad_argument("import descriptor belongs to another module"));
        }
        if self.operand_in_use(module, Payload::Import(import))? {
            return Err(KitError::bad_argument("import descriptor is still used by a function body"));
        }
        self.module_mut(module)?.imports.retain(|&i| i != import);
        self.imports.remove(import.index);
        Ok(())
    }

    pub(crate) fn detach_export(&mut self, module: ModuleRef, export: ExportRef) -> KitResult<()> {
        if self.export(export)?.module != module {
            return Err(KitError::bad_argument("export descriptor belongs to another module"));
        }
        if self.operand_in_use(module, Payload::Export(export))? {
            return Err(KitError::bad_argument("export descriptor is still used by a function body"));
        }
        self.module_mut(module)?.exports.retain(|&e| e != export);
        self.exports.remove(export.index);
        Ok(())
    }

    pub(crate) fn insert_external_module(
        &mut self,
        params: &ExternalModuleParams,
        target: Target,
    ) -> KitResult<ModuleRef> {
        params.validate(self)?;
        let name = self.create_string(&params.name);
        let index = self.modules.push(ModuleData::new(name, target, true));
        tracing::trace!(target: "abckit::modify", module = %params.name, %target, "added external module");
        Ok(ModuleRef::new(self.id, index))
    }

    /// Entity operands of placed instructions must still exist
    fn check_graph_operands(&self, graph: &Graph) -> KitResult<()> {
        for index in graph.attached_insts() {
            match graph.insts[index as usize].payload {
                Some(Payload::String(r)) => {
                    self.string_to_str(r)?;
                }
                Some(Payload::LiteralArray(r)) => {
                    self.literal_array(r)?;
                }
                Some(Payload::Function(r)) => {
                    self.function(r)?;
                }
                Some(Payload::Module(r)) => {
                    self.module(r)?;
                }
                Some(Payload::Import(r)) => {
                    self.import(r)?;
                }
                Some(Payload::Export(r)) => {
                    self.export(r)?;
                }
                Some(Payload::Class(r)) => {
                    self.class(r)?;
                }
                Some(Payload::Type(_)) | None => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::{FileBuilder, FunctionDecl};
    use crate::metadata::Scope;
    use crate::status::Status;
    use crate::target::{Mode, Target};

    #[test]
    fn test_graph_from_another_file_is_rejected() {
        let mut a = FileBuilder::new(Mode::Dynamic);
        let ma = a.add_module("a", Target::Js).unwrap();
        let fa = a.add_function(Scope::Module(ma), "f", FunctionDecl::new()).unwrap();
        let mut a = a.build();

        let mut b = FileBuilder::new(Mode::Dynamic);
        let mb = b.add_module("b", Target::Js).unwrap();
        let fb = b.add_function(Scope::Module(mb), "g", FunctionDecl::new()).unwrap();
        let b = b.build();

        let before = a.function(fa).unwrap().body.clone();
        let foreign = b.create_graph_from_function(fb).unwrap();
        let err = a.function_set_graph(fa, &foreign).unwrap_err();
        assert_eq!(err.status(), Status::WrongCtx);
        assert_eq!(a.function(fa).unwrap().body, before);
        assert!(a.function(fa).unwrap().attached.is_none());
    }

    #[test]
    fn test_unverified_graph_is_rejected() {
        let mut builder = FileBuilder::new(Mode::Static);
        let m = builder.add_module("m", Target::ArkTsV2).unwrap();
        let f = builder.add_function(Scope::Module(m), "f", FunctionDecl::static_fn()).unwrap();
        let mut file = builder.build();

        let mut graph = file.create_graph_from_function(f).unwrap();
        let body = graph.block_succ(graph.start_block(), 0).unwrap();
        graph.block_disconnect_succ(body, 0).unwrap();
        let err = file.function_set_graph(f, &graph).unwrap_err();
        assert_eq!(err.status(), Status::BadArgument);

        file.config.graph.verify_on_set = false;
        assert!(file.function_set_graph(f, &graph).is_ok());
    }
}
