//! 调用、成员访问与对象创建

use super::expr::{emit_constant, emit_expr, emit_index, enum_constant};
use super::CodeGen;
use crate::bytecode::{CallTarget, FieldRef, Instruction, MethodRef};
use crate::compiler::parser::expr::{FunctionCall, MemberAccess, MethodCall, NewObject};
use crate::compiler::parser::{Expr, ExprKind};
use crate::host::PropertyInfo;
use crate::translator::error::{TranslateError, TranslateErrorKind, TranslateResult};
use crate::translator::resolver::{Member, MemberTarget};
use crate::types::Type;

fn error<T>(kind: TranslateErrorKind, line: usize) -> TranslateResult<T> {
    Err(TranslateError::new(kind, line))
}

/// 实例成员接收者的压栈方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// 值类型变量的地址
    Address,
    /// 装箱后的值
    Boxed,
    /// 引用
    Reference,
}

impl Receiver {
    pub fn call(self, method: MethodRef, is_virtual: bool) -> Instruction {
        match self {
            Receiver::Reference if is_virtual => Instruction::CallVirt(method),
            _ => Instruction::Call(CallTarget::Host(method)),
        }
    }
}

/// 压入接收者：值类型变量取地址，其余值类型装箱
pub fn emit_receiver(
    cg: &mut CodeGen,
    target: &Expr,
    ty: &Type,
    owner: &Type,
) -> TranslateResult<Receiver> {
    if !cg.resolver().needs_box(ty) {
        emit_expr(cg, target)?;
        return Ok(Receiver::Reference);
    }
    if owner == ty {
        if let ExprKind::Identifier(id) = &target.kind {
            if let Some(slot) = cg.ctx.vars.get(&id.name).map(|v| v.slot) {
                cg.emit(Instruction::Ldloca(slot));
                return Ok(Receiver::Address);
            }
        }
    }
    emit_expr(cg, target)?;
    cg.emit(Instruction::Box(ty.clone()));
    Ok(Receiver::Boxed)
}

/// 属性访问器 `get_X` / `set_X`
pub fn property_accessor(property: &PropertyInfo, setter: bool) -> MethodRef {
    let (prefix, params, return_type) = if setter {
        ("set_", vec![property.property_type.clone()], Type::VOID)
    } else {
        ("get_", Vec::new(), property.property_type.clone())
    };
    MethodRef {
        owner: property.owner.clone(),
        name: format!("{prefix}{}", property.name),
        params,
        return_type,
        type_args: Vec::new(),
    }
}

pub fn emit_function_call(
    cg: &mut CodeGen,
    call: &FunctionCall,
    line: usize,
) -> TranslateResult<Type> {
    let resolved = cg.resolver().function_call(call, line)?;
    for (index, (arg, expected)) in call.args.iter().zip(&resolved.params).enumerate() {
        let found = emit_expr(cg, arg)?;
        match cg.resolver().assignment(&found, expected) {
            Some(coercion) => cg.emit_coercion(coercion),
            None => {
                return error(
                    TranslateErrorKind::ArgumentMismatch {
                        function: call.name.clone(),
                        index,
                        expected: expected.clone(),
                        found,
                    },
                    arg.line,
                )
            }
        }
    }
    cg.emit(Instruction::Call(CallTarget::Local {
        symbol: resolved.symbol,
        type_args: resolved.type_args,
    }));
    Ok(resolved.return_type)
}

pub fn emit_method_call(cg: &mut CodeGen, call: &MethodCall, line: usize) -> TranslateResult<Type> {
    let (target, selected) = cg.resolver().method_call(call, line)?;
    let method = selected.method_ref();
    let instruction = match &target {
        MemberTarget::Static(_) => Instruction::Call(CallTarget::Host(method)),
        MemberTarget::Instance(ty) => {
            let receiver = emit_receiver(cg, &call.target, ty, &selected.method.owner)?;
            receiver.call(method, selected.method.is_virtual)
        }
    };
    for (arg, coercion) in call.args.iter().zip(selected.coercions) {
        emit_expr(cg, arg)?;
        cg.emit_coercion(coercion);
    }
    cg.emit(instruction);
    Ok(selected.method.return_type)
}

/// 成员读取：枚举值、字段、属性
pub fn emit_member_load(
    cg: &mut CodeGen,
    expr: &Expr,
    access: &MemberAccess,
) -> TranslateResult<Type> {
    let line = expr.line;
    if let Some(ty) = cg.resolver().static_type_ref(expr) {
        return error(TranslateErrorKind::TypeUsedAsValue(ty), line);
    }
    let target = cg.resolver().classify(&access.target)?;
    match cg.resolver().member(&target, &access.member, line)? {
        Member::EnumValue {
            ty,
            underlying,
            value,
        } => {
            emit_constant(cg, &enum_constant(underlying, value));
            Ok(ty)
        }
        Member::Field(field) => {
            let field_ref = FieldRef {
                owner: target.ty().clone(),
                name: field.name.clone(),
                field_type: field.field_type.clone(),
            };
            if target.is_static() {
                cg.emit(Instruction::Ldsfld(field_ref));
            } else {
                emit_expr(cg, &access.target)?;
                cg.emit(Instruction::Ldfld(field_ref));
            }
            Ok(field.field_type)
        }
        Member::Property(property) => {
            if !property.has_getter {
                return error(TranslateErrorKind::NoGetter(property.name), line);
            }
            let getter = property_accessor(&property, false);
            let instruction = match &target {
                MemberTarget::Static(_) => Instruction::Call(CallTarget::Host(getter)),
                MemberTarget::Instance(ty) => {
                    let receiver = emit_receiver(cg, &access.target, ty, &property.owner)?;
                    receiver.call(getter, property.is_virtual)
                }
            };
            cg.emit(instruction);
            Ok(property.property_type)
        }
        Member::Nested(ty) => error(TranslateErrorKind::TypeUsedAsValue(ty), line),
    }
}

/// `new T[n]` 与 `new T(args)`
pub fn emit_new(cg: &mut CodeGen, new: &NewObject, line: usize) -> TranslateResult<Type> {
    let ty = cg.resolver().resolve_type(&new.type_name, line)?;
    if let Type::Array(element) = &ty {
        let [length] = new.args.as_slice() else {
            return error(TranslateErrorKind::ArrayLength(new.args.len()), line);
        };
        emit_index(cg, length)?;
        cg.emit(Instruction::NewArr((**element).clone()));
        return Ok(ty);
    }

    let args = new
        .args
        .iter()
        .map(|arg| cg.resolver().type_of(arg))
        .collect::<TranslateResult<Vec<_>>>()?;
    let (params, coercions) = cg.resolver().select_constructor(&ty, &args, line)?;
    for (arg, coercion) in new.args.iter().zip(coercions) {
        emit_expr(cg, arg)?;
        cg.emit_coercion(coercion);
    }
    cg.emit(Instruction::NewObj(MethodRef {
        owner: ty.clone(),
        name: ".ctor".to_string(),
        params,
        return_type: Type::VOID,
        type_args: Vec::new(),
    }));
    Ok(ty)
}
