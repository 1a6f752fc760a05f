//! 表达式翻译，返回表达式的静态类型

use super::call::{emit_function_call, emit_member_load, emit_method_call, emit_new};
use super::CodeGen;
use crate::bytecode::{CallTarget, ConvKind, Instruction, MethodRef};
use crate::compiler::parser::expr::{Binary, Cast};
use crate::compiler::parser::{BinaryOp, Constant, Expr, ExprKind, UnaryOp};
use crate::translator::error::{TranslateError, TranslateErrorKind, TranslateResult};
use crate::translator::resolver::{constant_type, conv_kind};
use crate::types::{Primitive, Type};

fn error<T>(kind: TranslateErrorKind, line: usize) -> TranslateResult<T> {
    Err(TranslateError::new(kind, line))
}

/// `System.String` 上的方法引用
pub fn string_method(name: &str, params: Vec<Type>, return_type: Type) -> MethodRef {
    MethodRef {
        owner: Type::STRING,
        name: name.to_string(),
        params,
        return_type,
        type_args: Vec::new(),
    }
}

pub fn emit_expr(cg: &mut CodeGen, expr: &Expr) -> TranslateResult<Type> {
    let line = expr.line;
    match &expr.kind {
        ExprKind::Constant(constant) => {
            emit_constant(cg, constant);
            Ok(constant_type(constant))
        }
        ExprKind::Identifier(id) => {
            if let Some(variable) = cg.ctx.vars.get(&id.name) {
                let (slot, ty) = (variable.slot, variable.ty.clone());
                cg.emit(Instruction::Ldloc(slot));
                return Ok(ty);
            }
            match cg.resolver().static_type_ref(expr) {
                Some(ty) => error(TranslateErrorKind::TypeUsedAsValue(ty), line),
                None => error(TranslateErrorKind::UndefinedVariable(id.name.clone()), line),
            }
        }
        ExprKind::Binary(binary) => emit_binary(cg, expr, binary),
        ExprKind::Unary(unary) => {
            let operand = emit_expr(cg, &unary.operand)?;
            let ty = cg.resolver().unary_result(unary.op, operand, line)?;
            match unary.op {
                UnaryOp::Neg => cg.emit(Instruction::Neg),
                UnaryOp::LogicalNot => {
                    cg.emit(Instruction::LdcI4(1));
                    cg.emit(Instruction::Xor);
                }
                UnaryOp::BitNot => cg.emit(Instruction::Not),
            }
            Ok(ty)
        }
        ExprKind::FunctionCall(call) => emit_function_call(cg, call, line),
        ExprKind::MethodCall(call) => emit_method_call(cg, call, line),
        ExprKind::MemberAccess(access) => emit_member_load(cg, expr, access),
        ExprKind::IndexAccess(access) => {
            let target = emit_expr(cg, &access.target)?;
            match target {
                Type::Array(element) => {
                    emit_index(cg, &access.index)?;
                    cg.emit(Instruction::Ldelem((*element).clone()));
                    Ok(*element)
                }
                ty if ty == Type::STRING => {
                    emit_index(cg, &access.index)?;
                    cg.emit(Instruction::CallVirt(string_method(
                        "get_Chars",
                        vec![Type::INT],
                        Type::CHAR,
                    )));
                    Ok(Type::CHAR)
                }
                other => error(TranslateErrorKind::NotIndexable(other), line),
            }
        }
        ExprKind::Cast(cast) => emit_cast(cg, cast, line),
        ExprKind::New(new) => emit_new(cg, new, line),
    }
}

/// 索引与数组长度，必须为 `int`
pub fn emit_index(cg: &mut CodeGen, index: &Expr) -> TranslateResult<()> {
    let ty = emit_expr(cg, index)?;
    if ty != Type::INT {
        return error(TranslateErrorKind::IndexNotInt(ty), index.line);
    }
    Ok(())
}

pub fn emit_constant(cg: &mut CodeGen, constant: &Constant) {
    let (load, conv) = match constant {
        Constant::SByte(v) => (Instruction::LdcI4(i32::from(*v)), Some(ConvKind::I1)),
        Constant::Byte(v) => (Instruction::LdcI4(i32::from(*v)), Some(ConvKind::U1)),
        Constant::Short(v) => (Instruction::LdcI4(i32::from(*v)), Some(ConvKind::I2)),
        Constant::UShort(v) => (Instruction::LdcI4(i32::from(*v)), Some(ConvKind::U2)),
        Constant::Char(c) => (Instruction::LdcI4(*c as i32), Some(ConvKind::U2)),
        Constant::Int(v) => (Instruction::LdcI4(*v), None),
        Constant::UInt(v) => (Instruction::LdcI4(*v as i32), Some(ConvKind::U4)),
        Constant::Long(v) => (Instruction::LdcI8(*v), None),
        Constant::ULong(v) => (Instruction::LdcI8(*v as i64), Some(ConvKind::U8)),
        Constant::Float(v) => (Instruction::LdcR4(*v), None),
        Constant::Double(v) => (Instruction::LdcR8(*v), None),
        Constant::Bool(v) => (Instruction::LdcI4(i32::from(*v)), None),
        Constant::String(s) => (Instruction::LdStr(s.clone()), None),
    };
    cg.emit(load);
    if let Some(kind) = conv {
        cg.emit(Instruction::Conv(kind));
    }
}

/// 枚举成员值按底层类型转为常量
pub fn enum_constant(underlying: Primitive, value: i64) -> Constant {
    match underlying {
        Primitive::SByte => Constant::SByte(value as i8),
        Primitive::Byte => Constant::Byte(value as u8),
        Primitive::Short => Constant::Short(value as i16),
        Primitive::UShort => Constant::UShort(value as u16),
        Primitive::UInt => Constant::UInt(value as u32),
        Primitive::Long => Constant::Long(value),
        Primitive::ULong => Constant::ULong(value as u64),
        _ => Constant::Int(value as i32),
    }
}

/// 结果类型由两侧已生成操作数的类型得出，不再重新遍历子树
fn emit_binary(cg: &mut CodeGen, expr: &Expr, binary: &Binary) -> TranslateResult<Type> {
    let line = expr.line;

    if binary.op.is_logical() {
        let end = cg.define_label();
        let left = emit_expr(cg, &binary.left)?;
        cg.emit(Instruction::Dup);
        cg.emit(match binary.op {
            BinaryOp::LogicalAnd => Instruction::Brfalse(end),
            _ => Instruction::Brtrue(end),
        });
        cg.emit(Instruction::Pop);
        let right = emit_expr(cg, &binary.right)?;
        cg.mark_label(end);
        return cg.resolver().binary_result(binary.op, left, right, line);
    }

    let left = emit_expr(cg, &binary.left)?;
    let right = emit_expr(cg, &binary.right)?;
    let is_string = left == Type::STRING;
    let result = cg.resolver().binary_result(binary.op, left, right, line)?;
    let string_equality = || {
        Instruction::Call(CallTarget::Host(string_method(
            "op_Equality",
            vec![Type::STRING, Type::STRING],
            Type::BOOL,
        )))
    };
    match binary.op {
        BinaryOp::Add if is_string => cg.emit(Instruction::Call(CallTarget::Host(
            string_method("Concat", vec![Type::STRING, Type::STRING], Type::STRING),
        ))),
        BinaryOp::Add => cg.emit(Instruction::Add),
        BinaryOp::Sub => cg.emit(Instruction::Sub),
        BinaryOp::Mul => cg.emit(Instruction::Mul),
        BinaryOp::Div => cg.emit(Instruction::Div),
        BinaryOp::Rem => cg.emit(Instruction::Rem),
        BinaryOp::BitAnd => cg.emit(Instruction::And),
        BinaryOp::BitOr => cg.emit(Instruction::Or),
        BinaryOp::BitXor => cg.emit(Instruction::Xor),
        BinaryOp::ShiftLeft => cg.emit(Instruction::Shl),
        BinaryOp::ShiftRight => cg.emit(Instruction::Shr),
        BinaryOp::Equal | BinaryOp::NotEqual => {
            cg.emit(if is_string {
                string_equality()
            } else {
                Instruction::Ceq
            });
            if binary.op == BinaryOp::NotEqual {
                cg.emit(Instruction::LdcI4(0));
                cg.emit(Instruction::Ceq);
            }
        }
        BinaryOp::Less => cg.emit(Instruction::Clt),
        BinaryOp::LessEqual => cg.emit(Instruction::Cle),
        BinaryOp::Greater => cg.emit(Instruction::Cgt),
        BinaryOp::GreaterEqual => cg.emit(Instruction::Cge),
        BinaryOp::LogicalAnd | BinaryOp::LogicalOr => {}
    }
    Ok(result)
}

/// 值类型转换所用的基本类型（枚举取底层类型）
fn numeric_base(cg: &CodeGen, ty: &Type) -> Option<Primitive> {
    ty.as_primitive()
        .filter(|p| p.is_value_type())
        .or_else(|| cg.host.enum_underlying(ty))
}

fn emit_cast(cg: &mut CodeGen, cast: &Cast, line: usize) -> TranslateResult<Type> {
    if let Some(name) = cast.type_name.simple_name() {
        if cg.ctx.vars.contains(name) {
            return error(TranslateErrorKind::AmbiguousCast(name.to_string()), line);
        }
    }
    let to = cg.resolver().resolve_type(&cast.type_name, line)?;
    let from = emit_expr(cg, &cast.value)?;
    let invalid = || TranslateErrorKind::InvalidCast {
        from: from.clone(),
        to: to.clone(),
    };
    if from.is_void() || to.is_void() {
        return error(invalid(), line);
    }
    if from == to {
        return Ok(to);
    }

    let resolver = cg.resolver();
    let (from_value, to_value) = (resolver.needs_box(&from), resolver.needs_box(&to));
    match (from_value, to_value) {
        (true, true) => {
            if matches!(from, Type::Generic { .. }) || matches!(to, Type::Generic { .. }) {
                cg.emit(Instruction::Box(from.clone()));
                cg.emit(Instruction::UnboxAny(to.clone()));
            } else {
                let kind = numeric_base(cg, &from)
                    .and(numeric_base(cg, &to))
                    .and_then(conv_kind);
                match kind {
                    Some(kind) => cg.emit(Instruction::Conv(kind)),
                    None => return error(invalid(), line),
                }
            }
        }
        (true, false) => {
            cg.emit(Instruction::Box(from.clone()));
            if to != Type::OBJECT {
                cg.emit(Instruction::CastClass(to.clone()));
            }
        }
        (false, true) => cg.emit(Instruction::UnboxAny(to.clone())),
        (false, false) => cg.emit(Instruction::CastClass(to.clone())),
    }
    Ok(to)
}
