//! Dynamic (ECMAScript family) instructions
//!
//! The accumulator of the underlying bytecode is modelled as an ordinary
//! first input, so `add2 acc, v` becomes an instruction with two inputs.

use super::graph::{Graph, InstRef};
use super::opcode::{define_isa, Arity::Fixed, Arity::Variadic, ConditionCode, OpcodeInfo, Opcode, Payload};
use crate::metadata::{ExportRef, FunctionRef, ImportRef, LiteralArrayRef, ModuleRef, StringRef};
use crate::status::KitResult;
use crate::target::Mode;

const TERM: u8 = OpcodeInfo::TERMINATOR;
const BRANCH: u8 = OpcodeInfo::BRANCH | OpcodeInfo::CONDITION;

define_isa! {
    /// Dynamic instruction opcodes
    pub enum DynOpcode {
        LoadString => "loadstring", Fixed(0), 0, String, 0;
        Ldnan => "ldnan", Fixed(0), 0, None, 0;
        Ldinfinity => "ldinfinity", Fixed(0), 0, None, 0;
        Ldundefined => "ldundefined", Fixed(0), 0, None, 0;
        Ldnull => "ldnull", Fixed(0), 0, None, 0;
        Ldsymbol => "ldsymbol", Fixed(0), 0, None, 0;
        Ldglobal => "ldglobal", Fixed(0), 0, None, 0;
        Ldtrue => "ldtrue", Fixed(0), 0, None, 0;
        Ldfalse => "ldfalse", Fixed(0), 0, None, 0;
        Ldhole => "ldhole", Fixed(0), 0, None, 0;
        Ldthis => "ldthis", Fixed(0), 0, None, 0;
        Ldfunction => "ldfunction", Fixed(0), 0, None, 0;
        Ldnewtarget => "ldnewtarget", Fixed(0), 0, None, 0;
        Debugger => "debugger", Fixed(0), 0, None, 0;
        Createemptyobject => "createemptyobject", Fixed(0), 0, None, 0;
        Createemptyarray => "createemptyarray", Fixed(0), 0, None, 0;
        Createarraywithbuffer => "createarraywithbuffer", Fixed(0), 0, LiteralArray, 0;
        Createobjectwithbuffer => "createobjectwithbuffer", Fixed(0), 0, LiteralArray, 0;
        Definefunc => "definefunc", Fixed(0), 1, Function, 0;
        Getunmappedargs => "getunmappedargs", Fixed(0), 0, None, 0;
        Copyrestargs => "copyrestargs", Fixed(0), 1, None, 0;
        Add2 => "add2", Fixed(2), 0, None, 0;
        Sub2 => "sub2", Fixed(2), 0, None, 0;
        Mul2 => "mul2", Fixed(2), 0, None, 0;
        Div2 => "div2", Fixed(2), 0, None, 0;
        Mod2 => "mod2", Fixed(2), 0, None, 0;
        Exp => "exp", Fixed(2), 0, None, 0;
        Shl2 => "shl2", Fixed(2), 0, None, 0;
        Shr2 => "shr2", Fixed(2), 0, None, 0;
        Ashr2 => "ashr2", Fixed(2), 0, None, 0;
        And2 => "and2", Fixed(2), 0, None, 0;
        Or2 => "or2", Fixed(2), 0, None, 0;
        Xor2 => "xor2", Fixed(2), 0, None, 0;
        Eq => "eq", Fixed(2), 0, None, 0;
        Noteq => "noteq", Fixed(2), 0, None, 0;
        Less => "less", Fixed(2), 0, None, 0;
        Lesseq => "lesseq", Fixed(2), 0, None, 0;
        Greater => "greater", Fixed(2), 0, None, 0;
        Greatereq => "greatereq", Fixed(2), 0, None, 0;
        Stricteq => "stricteq", Fixed(2), 0, None, 0;
        Strictnoteq => "strictnoteq", Fixed(2), 0, None, 0;
        Isin => "isin", Fixed(2), 0, None, 0;
        Instanceof => "instanceof", Fixed(2), 0, None, 0;
        Typeof => "typeof", Fixed(1), 0, None, 0;
        Tonumber => "tonumber", Fixed(1), 0, None, 0;
        Tonumeric => "tonumeric", Fixed(1), 0, None, 0;
        Neg => "neg", Fixed(1), 0, None, 0;
        Not => "not", Fixed(1), 0, None, 0;
        Inc => "inc", Fixed(1), 0, None, 0;
        Dec => "dec", Fixed(1), 0, None, 0;
        Istrue => "istrue", Fixed(1), 0, None, 0;
        Isfalse => "isfalse", Fixed(1), 0, None, 0;
        Callarg0 => "callarg0", Fixed(1), 0, None, 0;
        Callarg1 => "callarg1", Fixed(2), 0, None, 0;
        Callargs2 => "callargs2", Fixed(3), 0, None, 0;
        Callargs3 => "callargs3", Fixed(4), 0, None, 0;
        Callthis0 => "callthis0", Fixed(2), 0, None, 0;
        Callthis1 => "callthis1", Fixed(3), 0, None, 0;
        Callthis2 => "callthis2", Fixed(4), 0, None, 0;
        Callrange => "callrange", Variadic { min: 1 }, 0, None, 0;
        Newobjrange => "newobjrange", Variadic { min: 1 }, 0, None, 0;
        Ldobjbyname => "ldobjbyname", Fixed(1), 0, String, 0;
        Stobjbyname => "stobjbyname", Fixed(2), 0, String, 0;
        Ldobjbyvalue => "ldobjbyvalue", Fixed(2), 0, None, 0;
        Stobjbyvalue => "stobjbyvalue", Fixed(3), 0, None, 0;
        Tryldglobalbyname => "tryldglobalbyname", Fixed(0), 0, String, 0;
        Trystglobalbyname => "trystglobalbyname", Fixed(1), 0, String, 0;
        Ldglobalvar => "ldglobalvar", Fixed(0), 0, String, 0;
        Stglobalvar => "stglobalvar", Fixed(1), 0, String, 0;
        Ldexternalmodulevar => "ldexternalmodulevar", Fixed(0), 0, Import, 0;
        Ldlocalmodulevar => "ldlocalmodulevar", Fixed(0), 0, Export, 0;
        Stmodulevar => "stmodulevar", Fixed(1), 0, Export, 0;
        Getmodulenamespace => "getmodulenamespace", Fixed(0), 0, Module, 0;
        Dynamicimport => "dynamicimport", Fixed(1), 0, None, 0;
        If => "if", Fixed(1), 1, None, BRANCH;
        Return => "return", Fixed(1), 0, None, TERM;
        Returnundefined => "returnundefined", Fixed(0), 0, None, TERM;
        Throw => "throw", Fixed(1), 0, None, TERM;
    }
}

/// Builder for dynamic instructions
///
/// Obtained from [`Graph::dynamic_isa`], which rejects static graphs.
/// Created instructions are detached; insert them with the block and
/// instruction placement operations.
pub struct DynamicIsa<'g> {
    graph: &'g mut Graph,
}

impl Graph {
    /// Dynamic instruction builder, `WrongMode` for static graphs
    pub fn dynamic_isa(&mut self) -> KitResult<DynamicIsa<'_>> {
        self.mode.expect(Mode::Dynamic, "dynamic ISA")?;
        Ok(DynamicIsa { graph: self })
    }
}

macro_rules! nullary {
    ($($method:ident => $op:ident;)*) => {
        $(
            pub fn $method(&mut self) -> KitResult<InstRef> {
                self.emit(DynOpcode::$op, &[], &[], None)
            }
        )*
    };
}

macro_rules! unary {
    ($($method:ident => $op:ident;)*) => {
        $(
            pub fn $method(&mut self, acc: InstRef) -> KitResult<InstRef> {
                self.emit(DynOpcode::$op, &[acc], &[], None)
            }
        )*
    };
}

macro_rules! binary {
    ($($method:ident => $op:ident;)*) => {
        $(
            pub fn $method(&mut self, acc: InstRef, input: InstRef) -> KitResult<InstRef> {
                self.emit(DynOpcode::$op, &[acc, input], &[], None)
            }
        )*
    };
}

impl<'g> DynamicIsa<'g> {
    fn emit(
        &mut self,
        op: DynOpcode,
        inputs: &[InstRef],
        imms: &[u64],
        payload: Option<Payload>,
    ) -> KitResult<InstRef> {
        self.graph
            .new_inst(Opcode::Dynamic(op), inputs, imms, payload, None)
    }

    nullary! {
        create_ldnan => Ldnan;
        create_ldinfinity => Ldinfinity;
        create_ldundefined => Ldundefined;
        create_ldnull => Ldnull;
        create_ldsymbol => Ldsymbol;
        create_ldglobal => Ldglobal;
        create_ldtrue => Ldtrue;
        create_ldfalse => Ldfalse;
        create_ldhole => Ldhole;
        create_ldthis => Ldthis;
        create_ldfunction => Ldfunction;
        create_ldnewtarget => Ldnewtarget;
        create_debugger => Debugger;
        create_createemptyobject => Createemptyobject;
        create_createemptyarray => Createemptyarray;
        create_getunmappedargs => Getunmappedargs;
        create_returnundefined => Returnundefined;
    }

    unary! {
        create_typeof => Typeof;
        create_tonumber => Tonumber;
        create_tonumeric => Tonumeric;
        create_neg => Neg;
        create_not => Not;
        create_inc => Inc;
        create_dec => Dec;
        create_istrue => Istrue;
        create_isfalse => Isfalse;
        create_callarg0 => Callarg0;
        create_dynamicimport => Dynamicimport;
        create_return => Return;
        create_throw => Throw;
    }

    binary! {
        create_add2 => Add2;
        create_sub2 => Sub2;
        create_mul2 => Mul2;
        create_div2 => Div2;
        create_mod2 => Mod2;
        create_exp => Exp;
        create_shl2 => Shl2;
        create_shr2 => Shr2;
        create_ashr2 => Ashr2;
        create_and2 => And2;
        create_or2 => Or2;
        create_xor2 => Xor2;
        create_eq => Eq;
        create_noteq => Noteq;
        create_less => Less;
        create_lesseq => Lesseq;
        create_greater => Greater;
        create_greatereq => Greatereq;
        create_stricteq => Stricteq;
        create_strictnoteq => Strictnoteq;
        create_isin => Isin;
        create_instanceof => Instanceof;
        create_callarg1 => Callarg1;
        create_callthis0 => Callthis0;
        create_ldobjbyvalue => Ldobjbyvalue;
    }

    pub fn create_load_string(&mut self, string: StringRef) -> KitResult<InstRef> {
        self.emit(DynOpcode::LoadString, &[], &[], Some(Payload::String(string)))
    }

    pub fn create_createarraywithbuffer(&mut self, array: LiteralArrayRef) -> KitResult<InstRef> {
        self.emit(
            DynOpcode::Createarraywithbuffer,
            &[],
            &[],
            Some(Payload::LiteralArray(array)),
        )
    }

    pub fn create_createobjectwithbuffer(&mut self, array: LiteralArrayRef) -> KitResult<InstRef> {
        self.emit(
            DynOpcode::Createobjectwithbuffer,
            &[],
            &[],
            Some(Payload::LiteralArray(array)),
        )
    }

    /// `definefunc` for `function` with its declared parameter count
    pub fn create_definefunc(&mut self, function: FunctionRef, arg_count: u64) -> KitResult<InstRef> {
        self.emit(
            DynOpcode::Definefunc,
            &[],
            &[arg_count],
            Some(Payload::Function(function)),
        )
    }

    pub fn create_copyrestargs(&mut self, index: u64) -> KitResult<InstRef> {
        self.emit(DynOpcode::Copyrestargs, &[], &[index], None)
    }

    pub fn create_callargs2(&mut self, callee: InstRef, a0: InstRef, a1: InstRef) -> KitResult<InstRef> {
        self.emit(DynOpcode::Callargs2, &[callee, a0, a1], &[], None)
    }

    pub fn create_callargs3(
        &mut self,
        callee: InstRef,
        a0: InstRef,
        a1: InstRef,
        a2: InstRef,
    ) -> KitResult<InstRef> {
        self.emit(DynOpcode::Callargs3, &[callee, a0, a1, a2], &[], None)
    }

    pub fn create_callthis1(&mut self, callee: InstRef, this: InstRef, a0: InstRef) -> KitResult<InstRef> {
        self.emit(DynOpcode::Callthis1, &[callee, this, a0], &[], None)
    }

    pub fn create_callthis2(
        &mut self,
        callee: InstRef,
        this: InstRef,
        a0: InstRef,
        a1: InstRef,
    ) -> KitResult<InstRef> {
        self.emit(DynOpcode::Callthis2, &[callee, this, a0, a1], &[], None)
    }

    /// `callrange callee, args...`
    pub fn create_callrange(&mut self, callee: InstRef, args: &[InstRef]) -> KitResult<InstRef> {
        let mut inputs = Vec::with_capacity(args.len() + 1);
        inputs.push(callee);
        inputs.extend_from_slice(args);
        self.emit(DynOpcode::Callrange, &inputs, &[], None)
    }

    /// `newobjrange class, args...`
    pub fn create_newobjrange(&mut self, class: InstRef, args: &[InstRef]) -> KitResult<InstRef> {
        let mut inputs = Vec::with_capacity(args.len() + 1);
        inputs.push(class);
        inputs.extend_from_slice(args);
        self.emit(DynOpcode::Newobjrange, &inputs, &[], None)
    }

    pub fn create_ldobjbyname(&mut self, object: InstRef, name: StringRef) -> KitResult<InstRef> {
        self.emit(DynOpcode::Ldobjbyname, &[object], &[], Some(Payload::String(name)))
    }

    pub fn create_stobjbyname(
        &mut self,
        value: InstRef,
        object: InstRef,
        name: StringRef,
    ) -> KitResult<InstRef> {
        self.emit(
            DynOpcode::Stobjbyname,
            &[value, object],
            &[],
            Some(Payload::String(name)),
        )
    }

    pub fn create_stobjbyvalue(
        &mut self,
        value: InstRef,
        object: InstRef,
        key: InstRef,
    ) -> KitResult<InstRef> {
        self.emit(DynOpcode::Stobjbyvalue, &[value, object, key], &[], None)
    }

    pub fn create_tryldglobalbyname(&mut self, name: StringRef) -> KitResult<InstRef> {
        self.emit(DynOpcode::Tryldglobalbyname, &[], &[], Some(Payload::String(name)))
    }

    pub fn create_trystglobalbyname(&mut self, value: InstRef, name: StringRef) -> KitResult<InstRef> {
        self.emit(
            DynOpcode::Trystglobalbyname,
            &[value],
            &[],
            Some(Payload::String(name)),
        )
    }

    pub fn create_ldglobalvar(&mut self, name: StringRef) -> KitResult<InstRef> {
        self.emit(DynOpcode::Ldglobalvar, &[], &[], Some(Payload::String(name)))
    }

    pub fn create_stglobalvar(&mut self, value: InstRef, name: StringRef) -> KitResult<InstRef> {
        self.emit(DynOpcode::Stglobalvar, &[value], &[], Some(Payload::String(name)))
    }

    pub fn create_ldexternalmodulevar(&mut self, import: ImportRef) -> KitResult<InstRef> {
        self.emit(
            DynOpcode::Ldexternalmodulevar,
            &[],
            &[],
            Some(Payload::Import(import)),
        )
    }

    pub fn create_ldlocalmodulevar(&mut self, export: ExportRef) -> KitResult<InstRef> {
        self.emit(DynOpcode::Ldlocalmodulevar, &[], &[], Some(Payload::Export(export)))
    }

    pub fn create_stmodulevar(&mut self, value: InstRef, export: ExportRef) -> KitResult<InstRef> {
        self.emit(DynOpcode::Stmodulevar, &[value], &[], Some(Payload::Export(export)))
    }

    pub fn create_getmodulenamespace(&mut self, module: ModuleRef) -> KitResult<InstRef> {
        self.emit(
            DynOpcode::Getmodulenamespace,
            &[],
            &[],
            Some(Payload::Module(module)),
        )
    }

    /// `if acc <cc> imm`; the owning block needs a true and a false successor
    pub fn create_if(&mut self, acc: InstRef, imm: u64, cc: ConditionCode) -> KitResult<InstRef> {
        if !matches!(cc, ConditionCode::Eq | ConditionCode::Ne) {
            return Err(crate::KitError::bad_argument(
                "dynamic if only compares for equality",
            ));
        }
        self.graph
            .new_inst(Opcode::Dynamic(DynOpcode::If), &[acc], &[imm], None, Some(cc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::FileId;
    use crate::status::Status;

    fn dynamic_graph() -> Graph {
        let file = FileId::fresh();
        Graph::new(file, FunctionRef::new(file, 0), Mode::Dynamic, 3)
    }

    #[test]
    fn test_static_graph_is_rejected() {
        let file = FileId::fresh();
        let mut graph = Graph::new(file, FunctionRef::new(file, 0), Mode::Static, 0);
        let err = graph.dynamic_isa().err().unwrap();
        assert_eq!(err.status(), Status::WrongMode);
    }

    #[test]
    fn test_build_add() {
        let mut graph = dynamic_graph();
        let p0 = graph.parameter(0).unwrap();
        let p1 = graph.parameter(1).unwrap();
        let add = graph.dynamic_isa().unwrap().create_add2(p0, p1).unwrap();
        assert_eq!(graph.dyn_opcode(add).unwrap(), Some(DynOpcode::Add2));
        assert_eq!(graph.inst_input_count(add).unwrap(), 2);
        assert_eq!(graph.inst_block(add).unwrap(), None);
    }

    #[test]
    fn test_payload_from_other_file() {
        let mut graph = dynamic_graph();
        let foreign = StringRef::new(FileId::fresh(), 0);
        let err = graph
            .dynamic_isa()
            .unwrap()
            .create_load_string(foreign)
            .unwrap_err();
        assert_eq!(err.status(), Status::WrongCtx);
    }

    #[test]
    fn test_variadic_call() {
        let mut graph = dynamic_graph();
        let callee = graph.parameter(0).unwrap();
        let a = graph.parameter(1).unwrap();
        let b = graph.parameter(2).unwrap();
        let call = graph
            .dynamic_isa()
            .unwrap()
            .create_callrange(callee, &[a, b])
            .unwrap();
        assert_eq!(graph.inst_input_count(call).unwrap(), 3);
        graph.inst_append_input(call, a).unwrap();
        assert_eq!(graph.inst_input_count(call).unwrap(), 4);

        let neg = graph.dynamic_isa().unwrap().create_neg(a).unwrap();
        assert!(graph.inst_append_input(neg, b).is_err());
    }

    #[test]
    fn test_if_condition() {
        let mut graph = dynamic_graph();
        let p = graph.parameter(0).unwrap();
        assert!(graph
            .dynamic_isa()
            .unwrap()
            .create_if(p, 0, ConditionCode::Lt)
            .is_err());
        let branch = graph
            .dynamic_isa()
            .unwrap()
            .create_if(p, 0, ConditionCode::Eq)
            .unwrap();
        assert_eq!(graph.inst_condition_code(branch).unwrap(), ConditionCode::Eq);
        assert_eq!(graph.inst_immediate(branch, 0).unwrap(), 0);
    }
}
