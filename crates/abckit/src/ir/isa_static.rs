//! Static (ArkTS) instructions

use super::graph::{Graph, InstRef};
use super::opcode::{define_isa, Arity::Fixed, Arity::Variadic, ConditionCode, OpcodeInfo, Opcode, Payload};
use crate::metadata::{ClassRef, FunctionRef, LiteralArrayRef, StringRef, TypeId};
use crate::status::{KitError, KitResult};
use crate::target::Mode;

const TERM: u8 = OpcodeInfo::TERMINATOR;
const BRANCH: u8 = OpcodeInfo::BRANCH | OpcodeInfo::CONDITION;
const COND: u8 = OpcodeInfo::CONDITION;

define_isa! {
    /// Static instruction opcodes
    pub enum StaticOpcode {
        LoadString => "LoadString", Fixed(0), 0, String, 0;
        LoadConstArray => "LoadConstArray", Fixed(0), 0, LiteralArray, 0;
        LoadUndefined => "LoadUndefined", Fixed(0), 0, None, 0;
        Add => "Add", Fixed(2), 0, None, 0;
        Sub => "Sub", Fixed(2), 0, None, 0;
        Mul => "Mul", Fixed(2), 0, None, 0;
        Div => "Div", Fixed(2), 0, None, 0;
        Mod => "Mod", Fixed(2), 0, None, 0;
        Shl => "Shl", Fixed(2), 0, None, 0;
        Shr => "Shr", Fixed(2), 0, None, 0;
        AShr => "AShr", Fixed(2), 0, None, 0;
        And => "And", Fixed(2), 0, None, 0;
        Or => "Or", Fixed(2), 0, None, 0;
        Xor => "Xor", Fixed(2), 0, None, 0;
        Neg => "Neg", Fixed(1), 0, None, 0;
        Not => "Not", Fixed(1), 0, None, 0;
        Cmp => "Cmp", Fixed(2), 0, None, 0;
        Compare => "Compare", Fixed(2), 0, None, COND;
        Equals => "Equals", Fixed(2), 0, None, 0;
        Cast => "Cast", Fixed(1), 0, Type, 0;
        IsUndefined => "IsUndefined", Fixed(1), 0, None, 0;
        CallStatic => "CallStatic", Variadic { min: 0 }, 0, Function, 0;
        CallVirtual => "CallVirtual", Variadic { min: 1 }, 0, Function, 0;
        NewObject => "NewObject", Fixed(0), 0, Class, 0;
        NewArray => "NewArray", Fixed(1), 0, Class, 0;
        LenArray => "LenArray", Fixed(1), 0, None, 0;
        LoadArray => "LoadArray", Fixed(2), 0, Type, 0;
        StoreArray => "StoreArray", Fixed(3), 0, Type, 0;
        CheckCast => "CheckCast", Fixed(1), 0, Class, 0;
        IsInstance => "IsInstance", Fixed(1), 0, Class, 0;
        If => "If", Fixed(2), 0, None, BRANCH;
        Return => "Return", Fixed(1), 0, None, TERM;
        ReturnVoid => "ReturnVoid", Fixed(0), 0, None, TERM;
        Throw => "Throw", Fixed(1), 0, None, TERM;
    }
}

/// Builder for static instructions
///
/// Obtained from [`Graph::static_isa`], which rejects dynamic graphs.
pub struct StaticIsa<'g> {
    graph: &'g mut Graph,
}

impl Graph {
    /// Static instruction builder, `WrongMode` for dynamic graphs
    pub fn static_isa(&mut self) -> KitResult<StaticIsa<'_>> {
        self.mode.expect(Mode::Static, "static ISA")?;
        Ok(StaticIsa { graph: self })
    }
}

macro_rules! binary {
    ($($method:ident => $op:ident;)*) => {
        $(
            pub fn $method(&mut self, lhs: InstRef, rhs: InstRef) -> KitResult<InstRef> {
                self.emit(StaticOpcode::$op, &[lhs, rhs], None, None)
            }
        )*
    };
}

fn check_value_type(ty: TypeId) -> KitResult<()> {
    match ty {
        TypeId::Invalid | TypeId::Void | TypeId::LiteralArray => Err(KitError::bad_argument(
            format!("{:?} is not a value type", ty),
        )),
        _ => Ok(()),
    }
}

impl<'g> StaticIsa<'g> {
    fn emit(
        &mut self,
        op: StaticOpcode,
        inputs: &[InstRef],
        payload: Option<Payload>,
        cc: Option<ConditionCode>,
    ) -> KitResult<InstRef> {
        self.graph
            .new_inst(Opcode::Static(op), inputs, &[], payload, cc)
    }

    binary! {
        create_add => Add;
        create_sub => Sub;
        create_mul => Mul;
        create_div => Div;
        create_mod => Mod;
        create_shl => Shl;
        create_shr => Shr;
        create_ashr => AShr;
        create_and => And;
        create_or => Or;
        create_xor => Xor;
        create_cmp => Cmp;
        create_equals => Equals;
    }

    pub fn create_neg(&mut self, input: InstRef) -> KitResult<InstRef> {
        self.emit(StaticOpcode::Neg, &[input], None, None)
    }

    pub fn create_not(&mut self, input: InstRef) -> KitResult<InstRef> {
        self.emit(StaticOpcode::Not, &[input], None, None)
    }

    pub fn create_compare(&mut self, lhs: InstRef, rhs: InstRef, cc: ConditionCode) -> KitResult<InstRef> {
        self.emit(StaticOpcode::Compare, &[lhs, rhs], None, Some(cc))
    }

    pub fn create_load_string(&mut self, string: StringRef) -> KitResult<InstRef> {
        self.emit(StaticOpcode::LoadString, &[], Some(Payload::String(string)), None)
    }

    pub fn create_load_const_array(&mut self, array: LiteralArrayRef) -> KitResult<InstRef> {
        self.emit(
            StaticOpcode::LoadConstArray,
            &[],
            Some(Payload::LiteralArray(array)),
            None,
        )
    }

    pub fn create_load_undefined(&mut self) -> KitResult<InstRef> {
        self.emit(StaticOpcode::LoadUndefined, &[], None, None)
    }

    pub fn create_cast(&mut self, input: InstRef, target: TypeId) -> KitResult<InstRef> {
        check_value_type(target)?;
        self.emit(StaticOpcode::Cast, &[input], Some(Payload::Type(target)), None)
    }

    pub fn create_is_undefined(&mut self, input: InstRef) -> KitResult<InstRef> {
        self.emit(StaticOpcode::IsUndefined, &[input], None, None)
    }

    /// Call a static function with explicit arguments
    pub fn create_call_static(&mut self, function: FunctionRef, args: &[InstRef]) -> KitResult<InstRef> {
        self.emit(
            StaticOpcode::CallStatic,
            args,
            Some(Payload::Function(function)),
            None,
        )
    }

    /// Call a virtual method on `object` with explicit arguments
    pub fn create_call_virtual(
        &mut self,
        function: FunctionRef,
        object: InstRef,
        args: &[InstRef],
    ) -> KitResult<InstRef> {
        let mut inputs = Vec::with_capacity(args.len() + 1);
        inputs.push(object);
        inputs.extend_from_slice(args);
        self.emit(
            StaticOpcode::CallVirtual,
            &inputs,
            Some(Payload::Function(function)),
            None,
        )
    }

    pub fn create_new_object(&mut self, class: ClassRef) -> KitResult<InstRef> {
        self.emit(StaticOpcode::NewObject, &[], Some(Payload::Class(class)), None)
    }

    pub fn create_new_array(&mut self, element_class: ClassRef, size: InstRef) -> KitResult<InstRef> {
        self.emit(
            StaticOpcode::NewArray,
            &[size],
            Some(Payload::Class(element_class)),
            None,
        )
    }

    pub fn create_len_array(&mut self, array: InstRef) -> KitResult<InstRef> {
        self.emit(StaticOpcode::LenArray, &[array], None, None)
    }

    pub fn create_load_array(
        &mut self,
        array: InstRef,
        index: InstRef,
        element: TypeId,
    ) -> KitResult<InstRef> {
        check_value_type(element)?;
        self.emit(
            StaticOpcode::LoadArray,
            &[array, index],
            Some(Payload::Type(element)),
            None,
        )
    }

    pub fn create_store_array(
        &mut self,
        array: InstRef,
        index: InstRef,
        value: InstRef,
        element: TypeId,
    ) -> KitResult<InstRef> {
        check_value_type(element)?;
        self.emit(
            StaticOpcode::StoreArray,
            &[array, index, value],
            Some(Payload::Type(element)),
            None,
        )
    }

    pub fn create_check_cast(&mut self, input: InstRef, class: ClassRef) -> KitResult<InstRef> {
        self.emit(StaticOpcode::CheckCast, &[input], Some(Payload::Class(class)), None)
    }

    pub fn create_is_instance(&mut self, input: InstRef, class: ClassRef) -> KitResult<InstRef> {
        self.emit(StaticOpcode::IsInstance, &[input], Some(Payload::Class(class)), None)
    }

    /// `If lhs <cc> rhs`; the owning block needs a true and a false successor
    pub fn create_if(&mut self, lhs: InstRef, rhs: InstRef, cc: ConditionCode) -> KitResult<InstRef> {
        self.emit(StaticOpcode::If, &[lhs, rhs], None, Some(cc))
    }

    pub fn create_return(&mut self, value: InstRef) -> KitResult<InstRef> {
        self.emit(StaticOpcode::Return, &[value], None, None)
    }

    pub fn create_return_void(&mut self) -> KitResult<InstRef> {
        self.emit(StaticOpcode::ReturnVoid, &[], None, None)
    }

    pub fn create_throw(&mut self, value: InstRef) -> KitResult<InstRef> {
        self.emit(StaticOpcode::Throw, &[value], None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::FileId;
    use crate::status::Status;

    fn static_graph() -> Graph {
        let file = FileId::fresh();
        Graph::new(file, FunctionRef::new(file, 0), Mode::Static, 2)
    }

    #[test]
    fn test_dynamic_graph_is_rejected() {
        let file = FileId::fresh();
        let mut graph = Graph::new(file, FunctionRef::new(file, 0), Mode::Dynamic, 0);
        assert_eq!(graph.static_isa().err().unwrap().status(), Status::WrongMode);
        let c = graph.find_or_create_constant_i32(1);
        assert_eq!(graph.static_opcode(c).unwrap_err().status(), Status::WrongMode);
    }

    #[test]
    fn test_cast_rejects_void() {
        let mut graph = static_graph();
        let p = graph.parameter(0).unwrap();
        let err = graph.static_isa().unwrap().create_cast(p, TypeId::Void).unwrap_err();
        assert_eq!(err.status(), Status::BadArgument);
        let cast = graph.static_isa().unwrap().create_cast(p, TypeId::F64).unwrap();
        assert_eq!(graph.static_opcode(cast).unwrap(), Some(StaticOpcode::Cast));
    }

    #[test]
    fn test_call_static_without_args() {
        let mut graph = static_graph();
        let callee = FunctionRef::new(graph.file_id(), 3);
        let call = graph.static_isa().unwrap().create_call_static(callee, &[]).unwrap();
        assert_eq!(graph.inst_function(call).unwrap(), callee);
        assert_eq!(graph.inst_input_count(call).unwrap(), 0);
    }
}
