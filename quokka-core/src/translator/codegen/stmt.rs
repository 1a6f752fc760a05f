//! 语句翻译

use super::expr::{emit_expr, emit_index, string_method};
use super::call::{emit_receiver, property_accessor};
use super::CodeGen;
use crate::bytecode::{CallTarget, FieldRef, Instruction, MethodRef};
use crate::compiler::parser::expr::{IndexAccess, MemberAccess};
use crate::compiler::parser::stmt::{
    AssignStmt, BranchStmt, DoWhileStmt, ForStmt, ReturnStmt, WhileStmt,
};
use crate::compiler::parser::{Expr, ExprKind, Stmt, StmtKind};
use crate::translator::context::LoopLabels;
use crate::translator::error::{TranslateError, TranslateErrorKind, TranslateResult};
use crate::translator::resolver::{Member, MemberTarget};
use crate::types::Type;
use tracing::trace;

fn error<T>(kind: TranslateErrorKind, line: usize) -> TranslateResult<T> {
    Err(TranslateError::new(kind, line))
}

/// 逐条翻译语句；出错的语句被放弃并记录，后续语句继续
pub fn translate_statements(cg: &mut CodeGen, statements: &[Stmt]) -> TranslateResult<()> {
    for stmt in statements {
        if cg.diagnostics_full() {
            break;
        }
        if let Err(err) = translate_stmt(cg, stmt) {
            cg.report(err);
        }
    }
    Ok(())
}

/// 在子作用域中翻译循环体/分支体
fn translate_body(cg: &mut CodeGen, body: &Stmt) -> TranslateResult<()> {
    cg.scoped(|cg| match &body.kind {
        StmtKind::Block(block) => translate_statements(cg, &block.statements),
        _ => translate_stmt(cg, body),
    })
}

pub fn translate_stmt(cg: &mut CodeGen, stmt: &Stmt) -> TranslateResult<()> {
    let line = stmt.line;
    cg.emitter.set_line(line);
    trace!(target: "quokka::translator", line, %stmt, "Translate statement");

    match &stmt.kind {
        StmtKind::Function(decl) => error(TranslateErrorKind::NestedFunction(decl.name.clone()), line),
        StmtKind::Import(import) => {
            error(TranslateErrorKind::MisplacedImport(import.path.clone()), line)
        }
        StmtKind::Block(block) => cg.scoped(|cg| translate_statements(cg, &block.statements)),
        StmtKind::VarDecl(decl) => {
            let ty = cg.resolver().resolve_type(&decl.type_name, line)?;
            cg.declare_variable(&decl.name, &ty, line)?;
            Ok(())
        }
        StmtKind::Assign(assign) => translate_assign(cg, assign, line),
        StmtKind::Expr(stmt) => {
            let ty = emit_expr(cg, &stmt.expression)?;
            if !ty.is_void() {
                cg.emit(Instruction::Pop);
            }
            Ok(())
        }
        StmtKind::Branch(branch) => translate_branch(cg, branch),
        StmtKind::While(stmt) => translate_while(cg, stmt),
        StmtKind::DoWhile(stmt) => translate_do_while(cg, stmt),
        StmtKind::For(stmt) => translate_for(cg, stmt),
        StmtKind::Return(stmt) => translate_return(cg, stmt, line),
        StmtKind::Break => match cg.ctx.current_loop() {
            Some(labels) => {
                cg.emit(Instruction::Br(labels.break_label));
                Ok(())
            }
            None => error(TranslateErrorKind::NoEnclosingLoop("break"), line),
        },
        StmtKind::Continue => match cg.ctx.current_loop() {
            Some(labels) => {
                cg.emit(Instruction::Br(labels.continue_label));
                Ok(())
            }
            None => error(TranslateErrorKind::NoEnclosingLoop("continue"), line),
        },
        StmtKind::Compound(compound) => {
            translate_stmt(cg, &compound.first)?;
            translate_stmt(cg, &compound.second)
        }
    }
}

/// 条件表达式，必须为 `bool`
fn emit_condition(cg: &mut CodeGen, condition: &Expr) -> TranslateResult<()> {
    let ty = emit_expr(cg, condition)?;
    if ty != Type::BOOL {
        return error(TranslateErrorKind::ConditionNotBool(ty), condition.line);
    }
    Ok(())
}

/// 条件出错时记录错误并照常生成跳转，使分支体/循环体中的错误也能被报告
fn emit_condition_or_report(cg: &mut CodeGen, condition: &Expr) {
    if let Err(err) = emit_condition(cg, condition) {
        cg.report(err);
    }
}

fn translate_branch(cg: &mut CodeGen, branch: &BranchStmt) -> TranslateResult<()> {
    let end = cg.define_label();
    cg.scoped(|cg| {
        for arm in &branch.arms {
            let skip = cg.define_label();
            emit_condition_or_report(cg, &arm.condition);
            cg.emit(Instruction::Brfalse(skip));
            translate_body(cg, &arm.body)?;
            cg.emit(Instruction::Br(end));
            cg.mark_label(skip);
        }
        if let Some(else_body) = &branch.else_body {
            translate_body(cg, else_body)?;
        }
        Ok(())
    })?;
    cg.mark_label(end);
    Ok(())
}

/// 循环体：压入循环标签，结束后弹出
fn translate_loop_body(
    cg: &mut CodeGen,
    labels: LoopLabels,
    body: impl FnOnce(&mut CodeGen) -> TranslateResult<()>,
) -> TranslateResult<()> {
    cg.ctx.push_loop(labels);
    let result = body(cg);
    cg.ctx.pop_loop();
    result
}

fn translate_while(cg: &mut CodeGen, stmt: &WhileStmt) -> TranslateResult<()> {
    let start = cg.define_label();
    let end = cg.define_label();
    cg.mark_label(start);
    emit_condition_or_report(cg, &stmt.condition);
    cg.emit(Instruction::Brfalse(end));
    let labels = LoopLabels {
        continue_label: start,
        break_label: end,
    };
    translate_loop_body(cg, labels, |cg| translate_body(cg, &stmt.body))?;
    cg.emit(Instruction::Br(start));
    cg.mark_label(end);
    Ok(())
}

fn translate_do_while(cg: &mut CodeGen, stmt: &DoWhileStmt) -> TranslateResult<()> {
    let body = cg.define_label();
    let next = cg.define_label();
    let end = cg.define_label();
    cg.mark_label(body);
    let labels = LoopLabels {
        continue_label: next,
        break_label: end,
    };
    translate_loop_body(cg, labels, |cg| translate_body(cg, &stmt.body))?;
    cg.mark_label(next);
    emit_condition_or_report(cg, &stmt.condition);
    cg.emit(Instruction::Brfalse(end));
    cg.emit(Instruction::Br(body));
    cg.mark_label(end);
    Ok(())
}

/// `for (init; cond; iter) body` 按 `{ init; while (cond) { body; iter } }` 生成，
/// `continue` 跳到 `iter` 之前
fn translate_for(cg: &mut CodeGen, stmt: &ForStmt) -> TranslateResult<()> {
    cg.scoped(|cg| {
        translate_stmt(cg, &stmt.init)?;
        let start = cg.define_label();
        let end = cg.define_label();
        let next = cg.define_label();
        cg.mark_label(start);
        emit_condition_or_report(cg, &stmt.condition);
        cg.emit(Instruction::Brfalse(end));
        let labels = LoopLabels {
            continue_label: next,
            break_label: end,
        };
        translate_loop_body(cg, labels, |cg| {
            cg.scoped(|cg| {
                translate_body(cg, &stmt.body)?;
                cg.mark_label(next);
                translate_stmt(cg, &stmt.iter)
            })
        })?;
        cg.emit(Instruction::Br(start));
        cg.mark_label(end);
        Ok(())
    })
}

fn translate_return(cg: &mut CodeGen, stmt: &ReturnStmt, line: usize) -> TranslateResult<()> {
    let expected = cg.ctx.return_type.clone();
    match &stmt.value {
        None if expected.is_void() => {}
        None => {
            return error(
                TranslateErrorKind::ReturnMismatch {
                    expected,
                    found: Type::VOID,
                },
                line,
            )
        }
        Some(value) => {
            if expected.is_void() {
                let found = cg.resolver().type_of(value)?;
                return error(TranslateErrorKind::ReturnMismatch { expected, found }, line);
            }
            let found = emit_expr(cg, value)?;
            match cg.resolver().assignment(&found, &expected) {
                Some(coercion) => cg.emit_coercion(coercion),
                None => {
                    return error(TranslateErrorKind::ReturnMismatch { expected, found }, line)
                }
            }
        }
    }
    cg.emit(Instruction::Ret);
    Ok(())
}

/// 值转为存储目标类型（相同类型，或装箱到 `object`）
fn emit_store_value(cg: &mut CodeGen, value: &Expr, expected: &Type) -> TranslateResult<()> {
    let found = emit_expr(cg, value)?;
    match cg.resolver().assignment(&found, expected) {
        Some(coercion) => {
            cg.emit_coercion(coercion);
            Ok(())
        }
        None => error(
            TranslateErrorKind::AssignmentMismatch {
                expected: expected.clone(),
                found,
            },
            value.line,
        ),
    }
}

fn translate_assign(cg: &mut CodeGen, assign: &AssignStmt, line: usize) -> TranslateResult<()> {
    let destination = &assign.destination;
    match &destination.kind {
        ExprKind::Identifier(id) => {
            let Some(variable) = cg.ctx.vars.get(&id.name).cloned() else {
                if let Some(ty) = cg.resolver().static_type_ref(destination) {
                    return error(TranslateErrorKind::TypeUsedAsValue(ty), line);
                }
                return error(TranslateErrorKind::UndefinedVariable(id.name.clone()), line);
            };
            emit_store_value(cg, &assign.value, &variable.ty)?;
            cg.emit(Instruction::Stloc(variable.slot));
            Ok(())
        }
        ExprKind::IndexAccess(access) => translate_index_store(cg, access, &assign.value, line),
        ExprKind::MemberAccess(access) => {
            translate_member_store(cg, access, &assign.value, line)
        }
        _ => error(
            TranslateErrorKind::InvalidAssignmentTarget("expression is not assignable"),
            line,
        ),
    }
}

/// `s[i] = c` 与 `a[i] = v`
fn translate_index_store(
    cg: &mut CodeGen,
    access: &IndexAccess,
    value: &Expr,
    line: usize,
) -> TranslateResult<()> {
    let target = cg.resolver().type_of(&access.target)?;
    match target {
        Type::Array(element) => {
            emit_expr(cg, &access.target)?;
            emit_index(cg, &access.index)?;
            emit_store_value(cg, value, &element)?;
            cg.emit(Instruction::Stelem(*element));
            Ok(())
        }
        ty if ty == Type::STRING => {
            let variable = match &access.target.kind {
                ExprKind::Identifier(id) => cg.ctx.vars.get(&id.name).cloned(),
                _ => None,
            };
            let Some(variable) = variable else {
                return error(
                    TranslateErrorKind::InvalidAssignmentTarget(
                        "string index assignment requires a variable",
                    ),
                    line,
                );
            };
            let chars = Type::array_of(Type::CHAR);
            cg.emit(Instruction::Ldloc(variable.slot));
            cg.emit(Instruction::Call(CallTarget::Host(string_method(
                "ToCharArray",
                vec![],
                chars.clone(),
            ))));
            cg.emit(Instruction::Dup);
            emit_index(cg, &access.index)?;
            emit_store_value(cg, value, &Type::CHAR)?;
            cg.emit(Instruction::Stelem(Type::CHAR));
            cg.emit(Instruction::NewObj(MethodRef {
                owner: Type::STRING,
                name: ".ctor".to_string(),
                params: vec![chars],
                return_type: Type::VOID,
                type_args: Vec::new(),
            }));
            cg.emit(Instruction::Stloc(variable.slot));
            Ok(())
        }
        other => error(TranslateErrorKind::NotIndexable(other), line),
    }
}

/// 字段与属性赋值
fn translate_member_store(
    cg: &mut CodeGen,
    access: &MemberAccess,
    value: &Expr,
    line: usize,
) -> TranslateResult<()> {
    let target = cg.resolver().classify(&access.target)?;
    let member = cg.resolver().member(&target, &access.member, line)?;
    match member {
        Member::Field(field) => {
            let field_ref = FieldRef {
                owner: target.ty().clone(),
                name: field.name.clone(),
                field_type: field.field_type.clone(),
            };
            match &target {
                MemberTarget::Static(_) => {
                    emit_store_value(cg, value, &field.field_type)?;
                    cg.emit(Instruction::Stsfld(field_ref));
                }
                MemberTarget::Instance(ty) => {
                    if cg.host.is_value_type(ty) {
                        let variable = match &access.target.kind {
                            ExprKind::Identifier(id) => cg.ctx.vars.get(&id.name).cloned(),
                            _ => None,
                        };
                        let Some(variable) = variable else {
                            return error(
                                TranslateErrorKind::InvalidAssignmentTarget(
                                    "value-type receiver must be a variable",
                                ),
                                line,
                            );
                        };
                        cg.emit(Instruction::Ldloca(variable.slot));
                    } else {
                        emit_expr(cg, &access.target)?;
                    }
                    emit_store_value(cg, value, &field.field_type)?;
                    cg.emit(Instruction::Stfld(field_ref));
                }
            }
            Ok(())
        }
        Member::Property(property) => {
            if !property.has_setter {
                return error(TranslateErrorKind::NoSetter(property.name), line);
            }
            let setter = property_accessor(&property, true);
            let instruction = match &target {
                MemberTarget::Static(_) => {
                    emit_store_value(cg, value, &property.property_type)?;
                    Instruction::Call(CallTarget::Host(setter))
                }
                MemberTarget::Instance(ty) => {
                    let receiver = emit_receiver(cg, &access.target, ty, &property.owner)?;
                    emit_store_value(cg, value, &property.property_type)?;
                    receiver.call(setter, property.is_virtual)
                }
            };
            cg.emit(instruction);
            Ok(())
        }
        Member::EnumValue { .. } | Member::Nested(_) => error(
            TranslateErrorKind::InvalidAssignmentTarget("enum members and types cannot be assigned"),
            line,
        ),
    }
}

/// 函数体是否在所有路径上返回
pub fn always_returns(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::Return(_) => true,
        StmtKind::Block(block) => block.statements.last().is_some_and(|last| always_returns(last)),
        StmtKind::Branch(branch) => {
            branch
                .else_body
                .as_ref()
                .is_some_and(|else_body| always_returns(else_body))
                && branch.arms.iter().all(|arm| always_returns(&arm.body))
        }
        StmtKind::Compound(compound) => always_returns(&compound.second),
        _ => false,
    }
}
