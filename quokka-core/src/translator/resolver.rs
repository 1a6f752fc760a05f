//! 表达式类型推导与类型名解析

use super::context::TranslationContext;
use super::error::{TranslateError, TranslateErrorKind, TranslateResult};
use super::symbols::{LookupError, ModuleId, ModuleTable};
use crate::bytecode::{ConvKind, FunctionSymbol, MethodRef};
use crate::compiler::parser::expr::{Binary, FunctionCall, MethodCall};
use crate::compiler::parser::{BinaryOp, Constant, Expr, ExprKind, TypeName, UnaryOp};
use crate::host::{FieldInfo, HostTypeProvider, MethodInfo, PropertyInfo, TypeKind};
use crate::types::{Primitive, Type};

/// 成员访问的目标
#[derive(Debug, Clone, PartialEq)]
pub enum MemberTarget {
    /// 类型引用，只能访问静态成员，不压入接收者
    Static(Type),
    /// 值，访问实例成员
    Instance(Type),
}

impl MemberTarget {
    pub fn ty(&self) -> &Type {
        match self {
            MemberTarget::Static(ty) | MemberTarget::Instance(ty) => ty,
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self, MemberTarget::Static(_))
    }
}

/// 探测到的成员
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    EnumValue {
        ty: Type,
        underlying: Primitive,
        value: i64,
    },
    Field(FieldInfo),
    Property(PropertyInfo),
    Nested(Type),
}

/// 实参到形参的转换
#[derive(Debug, Clone, PartialEq)]
pub enum Coercion {
    Identity,
    Box(Type),
    Conv(ConvKind),
}

/// 重载决议结果，参数与返回类型已代入泛型实参
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedMethod {
    pub method: MethodInfo,
    pub type_args: Vec<Type>,
    pub coercions: Vec<Coercion>,
}

impl SelectedMethod {
    pub fn method_ref(&self) -> MethodRef {
        MethodRef {
            owner: self.method.owner.clone(),
            name: self.method.name.clone(),
            params: self.method.params.clone(),
            return_type: self.method.return_type.clone(),
            type_args: self.type_args.clone(),
        }
    }
}

/// 用户函数调用的解析结果
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCall {
    pub symbol: FunctionSymbol,
    pub type_args: Vec<Type>,
    pub params: Vec<Type>,
    pub return_type: Type,
}

/// 基本类型的数值转换指令
pub fn conv_kind(primitive: Primitive) -> Option<ConvKind> {
    match primitive {
        Primitive::SByte => Some(ConvKind::I1),
        Primitive::Byte => Some(ConvKind::U1),
        Primitive::Short => Some(ConvKind::I2),
        Primitive::UShort | Primitive::Char => Some(ConvKind::U2),
        Primitive::Int | Primitive::Bool => Some(ConvKind::I4),
        Primitive::UInt => Some(ConvKind::U4),
        Primitive::Long => Some(ConvKind::I8),
        Primitive::ULong => Some(ConvKind::U8),
        Primitive::Float => Some(ConvKind::R4),
        Primitive::Double => Some(ConvKind::R8),
        Primitive::Void | Primitive::String | Primitive::Object => None,
    }
}

/// 不丢失取值范围的隐式数值转换
fn is_widening(source: Primitive, target: Primitive) -> bool {
    use Primitive::*;
    match source {
        SByte => matches!(target, Short | Int | Long | Float | Double),
        Byte => matches!(target, Short | UShort | Int | UInt | Long | ULong | Float | Double),
        Short => matches!(target, Int | Long | Float | Double),
        UShort => matches!(target, Int | UInt | Long | ULong | Float | Double),
        Char => matches!(target, UShort | Int | UInt | Long | ULong | Float | Double),
        Int => matches!(target, Long | Float | Double),
        UInt => matches!(target, Long | ULong | Float | Double),
        Long | ULong => matches!(target, Float | Double),
        Float => target == Double,
        _ => false,
    }
}

/// 重载兼容匹配中单个实参的转换代价：恒等 < 拓宽 < 装箱 < 收窄
fn coercion_rank(from: &Type, to: &Type, coercion: &Coercion) -> u32 {
    match coercion {
        Coercion::Identity => 0,
        Coercion::Box(_) => 2,
        Coercion::Conv(_) => match (from.as_primitive(), to.as_primitive()) {
            (Some(source), Some(target)) if is_widening(source, target) => 1,
            _ => 3,
        },
    }
}

pub fn constant_type(constant: &Constant) -> Type {
    let primitive = match constant {
        Constant::SByte(_) => Primitive::SByte,
        Constant::Byte(_) => Primitive::Byte,
        Constant::Short(_) => Primitive::Short,
        Constant::UShort(_) => Primitive::UShort,
        Constant::Int(_) => Primitive::Int,
        Constant::UInt(_) => Primitive::UInt,
        Constant::Long(_) => Primitive::Long,
        Constant::ULong(_) => Primitive::ULong,
        Constant::Float(_) => Primitive::Float,
        Constant::Double(_) => Primitive::Double,
        Constant::Bool(_) => Primitive::Bool,
        Constant::Char(_) => Primitive::Char,
        Constant::String(_) => Primitive::String,
    };
    Type::Primitive(primitive)
}

/// 类型解析器
pub struct TypeResolver<'a> {
    host: &'a dyn HostTypeProvider,
    symbols: &'a ModuleTable,
    module: ModuleId,
    ctx: &'a TranslationContext,
}

impl<'a> TypeResolver<'a> {
    pub fn new(
        host: &'a dyn HostTypeProvider,
        symbols: &'a ModuleTable,
        module: ModuleId,
        ctx: &'a TranslationContext,
    ) -> Self {
        Self {
            host,
            symbols,
            module,
            ctx,
        }
    }

    fn error<T>(&self, kind: TranslateErrorKind, line: usize) -> TranslateResult<T> {
        Err(TranslateError::new(kind, line))
    }

    /// 宿主全名转类型（基本类型映射回关键字类型）
    fn host_type(full_name: String) -> Type {
        match Primitive::from_host_name(&full_name) {
            Some(primitive) => Type::Primitive(primitive),
            None => Type::host(full_name),
        }
    }

    /// 解析类型名：泛型参数、基本类型、宿主类型（经导入路径）
    pub fn resolve_type(&self, name: &TypeName, line: usize) -> TranslateResult<Type> {
        match name {
            TypeName::Array(element) => Ok(Type::array_of(self.resolve_type(element, line)?)),
            TypeName::Named { name, args } => {
                if args.is_empty() {
                    if let Some(generic) = self.ctx.generics.get(name) {
                        return Ok(generic.clone());
                    }
                    if let Some(primitive) = self.host.resolve_primitive(name) {
                        return Ok(primitive);
                    }
                }
                let args = args
                    .iter()
                    .map(|arg| self.resolve_type(arg, line))
                    .collect::<TranslateResult<Vec<_>>>()?;
                let imports = self.symbols.imports(self.module);
                let Some(full_name) = self.host.resolve_named(name, args.len(), &imports) else {
                    return self.error(TranslateErrorKind::UndefinedType(name.clone()), line);
                };
                if args.is_empty() {
                    return Ok(Self::host_type(full_name));
                }
                match self.host.instantiate_generic(&full_name, &args) {
                    Some(ty) => Ok(ty),
                    None => self.error(TranslateErrorKind::UndefinedType(name.clone()), line),
                }
            }
        }
    }

    /// 点分名称 `A.B.C`（仅由标识符组成）
    fn dotted_name(expr: &Expr) -> Option<String> {
        match &expr.kind {
            ExprKind::Identifier(id) => Some(id.name.clone()),
            ExprKind::MemberAccess(access) => {
                Self::dotted_name(&access.target).map(|prefix| format!("{prefix}.{}", access.member))
            }
            _ => None,
        }
    }

    /// 表达式若表示一个类型引用则返回该类型；局部变量优先于类型名
    pub fn static_type_ref(&self, expr: &Expr) -> Option<Type> {
        match &expr.kind {
            ExprKind::Identifier(id) => {
                if self.ctx.vars.contains(&id.name) {
                    return None;
                }
                if let Some(primitive) = self.host.resolve_primitive(&id.name) {
                    return (!primitive.is_void()).then_some(primitive);
                }
                let imports = self.symbols.imports(self.module);
                self.host
                    .resolve_named(&id.name, 0, &imports)
                    .map(Self::host_type)
            }
            ExprKind::MemberAccess(access) => {
                if let Some(outer) = self.static_type_ref(&access.target) {
                    let members = self.host.members_of(&outer)?;
                    return members
                        .nested(&access.member)
                        .map(|nested| Type::host(nested.full_name.clone()));
                }
                let dotted = Self::dotted_name(expr)?;
                let root = dotted.split('.').next().unwrap_or_default();
                if self.ctx.vars.contains(root) {
                    return None;
                }
                let imports = self.symbols.imports(self.module);
                self.host.resolve_named(&dotted, 0, &imports).map(Self::host_type)
            }
            _ => None,
        }
    }

    /// 成员访问目标：类型引用或值
    pub fn classify(&self, expr: &Expr) -> TranslateResult<MemberTarget> {
        match self.static_type_ref(expr) {
            Some(ty) => Ok(MemberTarget::Static(ty)),
            None => Ok(MemberTarget::Instance(self.type_of(expr)?)),
        }
    }

    /// 按 枚举值、字段、属性、嵌套类型 的顺序探测成员
    pub fn member(&self, target: &MemberTarget, name: &str, line: usize) -> TranslateResult<Member> {
        let ty = target.ty();
        let is_static = target.is_static();
        let not_found = TranslateErrorKind::MemberNotFound {
            ty: ty.clone(),
            member: name.to_string(),
        };
        let Some(members) = self.host.members_of(ty) else {
            return self.error(not_found, line);
        };

        if let TypeKind::Enum { underlying } = members.kind {
            if is_static {
                return match members.enum_value(name) {
                    Some(value) => Ok(Member::EnumValue {
                        ty: ty.clone(),
                        underlying,
                        value,
                    }),
                    None => self.error(not_found, line),
                };
            }
        }
        if let Some(field) = members.field(name).filter(|f| f.is_static == is_static) {
            return Ok(Member::Field(field.clone()));
        }
        if let Some(property) = members.property(name).filter(|p| p.is_static == is_static) {
            return Ok(Member::Property(property.clone()));
        }
        if is_static {
            if let Some(nested) = members.nested(name) {
                return Ok(Member::Nested(Type::host(nested.full_name.clone())));
            }
        }
        self.error(not_found, line)
    }

    /// 实参到形参的转换（重载兼容匹配）
    pub fn coercion(&self, from: &Type, to: &Type) -> Option<Coercion> {
        if from == to {
            return Some(Coercion::Identity);
        }
        if *to == Type::OBJECT {
            return Some(if self.needs_box(from) {
                Coercion::Box(from.clone())
            } else {
                Coercion::Identity
            });
        }
        if self.host.is_assignable(from, to) {
            return Some(Coercion::Identity);
        }
        match (from.as_primitive(), to.as_primitive()) {
            (Some(source), Some(target))
                if (source.is_numeric() || source == Primitive::Char)
                    && (target.is_numeric() || target == Primitive::Char) =>
            {
                conv_kind(target).map(Coercion::Conv)
            }
            _ => None,
        }
    }

    /// 赋值、返回与用户函数实参的检查：类型相同，或目标为 `object`
    pub fn assignment(&self, from: &Type, to: &Type) -> Option<Coercion> {
        if from == to {
            Some(Coercion::Identity)
        } else if *to == Type::OBJECT && !from.is_void() {
            self.coercion(from, to)
        } else {
            None
        }
    }

    /// 值类型或泛型占位（转为 `object` 需要装箱）
    pub fn needs_box(&self, ty: &Type) -> bool {
        matches!(ty, Type::Generic { .. }) || self.host.is_value_type(ty)
    }

    /// 宿主方法重载决议：先精确匹配，再兼容匹配
    pub fn select_method(
        &self,
        target: &MemberTarget,
        name: &str,
        args: &[Type],
        type_args: &[Type],
        line: usize,
    ) -> TranslateResult<SelectedMethod> {
        let ty = target.ty();
        let not_found = || TranslateErrorKind::MethodNotFound {
            ty: ty.clone(),
            name: name.to_string(),
            args: args.to_vec(),
        };
        let Some(members) = self.host.members_of(ty) else {
            return self.error(not_found(), line);
        };
        let named: Vec<&MethodInfo> = members
            .methods_named(name)
            .filter(|m| m.is_static == target.is_static())
            .collect();
        if named.is_empty() {
            return self.error(not_found(), line);
        }

        let candidates: Vec<&MethodInfo> = if type_args.is_empty() {
            let plain: Vec<_> = named.iter().copied().filter(|m| !m.is_generic()).collect();
            if plain.is_empty() {
                return self.error(TranslateErrorKind::IsGeneric(name.to_string()), line);
            }
            plain
        } else {
            let generic: Vec<_> = named.iter().copied().filter(|m| m.is_generic()).collect();
            let Some(first) = generic.first() else {
                return self.error(TranslateErrorKind::NotGeneric(name.to_string()), line);
            };
            let expected = first.generic_arity;
            let matching: Vec<_> = generic
                .into_iter()
                .filter(|m| m.generic_arity == type_args.len())
                .collect();
            if matching.is_empty() {
                return self.error(
                    TranslateErrorKind::TypeArgCount {
                        name: name.to_string(),
                        expected,
                        found: type_args.len(),
                    },
                    line,
                );
            }
            matching
        };

        let instantiated: Vec<MethodInfo> = candidates
            .into_iter()
            .filter(|m| m.params.len() == args.len())
            .map(|m| MethodInfo {
                params: m.params.iter().map(|p| p.substitute(&[], type_args)).collect(),
                return_type: m.return_type.substitute(&[], type_args),
                ..m.clone()
            })
            .collect();

        let selected = |method: &MethodInfo, coercions: Vec<Coercion>| SelectedMethod {
            method: method.clone(),
            type_args: type_args.to_vec(),
            coercions,
        };
        if let Some(exact) = instantiated.iter().find(|m| m.params == args) {
            return Ok(selected(exact, vec![Coercion::Identity; args.len()]));
        }
        match self.best_compatible(args, instantiated.iter().map(|m| m.params.as_slice())) {
            Some((index, coercions)) => Ok(selected(&instantiated[index], coercions)),
            None => self.error(not_found(), line),
        }
    }

    /// 构造函数决议，返回形参类型与实参转换
    pub fn select_constructor(
        &self,
        ty: &Type,
        args: &[Type],
        line: usize,
    ) -> TranslateResult<(Vec<Type>, Vec<Coercion>)> {
        let not_found = || TranslateErrorKind::ConstructorNotFound {
            ty: ty.clone(),
            args: args.to_vec(),
        };
        let Some(members) = self.host.members_of(ty) else {
            return self.error(not_found(), line);
        };
        let candidates: Vec<_> = members
            .constructors
            .iter()
            .filter(|c| c.params.len() == args.len())
            .collect();
        if let Some(exact) = candidates.iter().find(|c| c.params == args) {
            return Ok((exact.params.clone(), vec![Coercion::Identity; args.len()]));
        }
        match self.best_compatible(args, candidates.iter().map(|c| c.params.as_slice())) {
            Some((index, coercions)) => Ok((candidates[index].params.clone(), coercions)),
            None => self.error(not_found(), line),
        }
    }

    /// 兼容匹配：取转换代价最小的候选（先比最差的一个实参，再比总和），
    /// 代价相同时取先声明者
    fn best_compatible<'p>(
        &self,
        args: &[Type],
        candidates: impl Iterator<Item = &'p [Type]>,
    ) -> Option<(usize, Vec<Coercion>)> {
        candidates
            .enumerate()
            .filter_map(|(index, params)| {
                let coercions: Vec<Coercion> = args
                    .iter()
                    .zip(params)
                    .map(|(arg, param)| self.coercion(arg, param))
                    .collect::<Option<_>>()?;
                let ranks: Vec<u32> = args
                    .iter()
                    .zip(params)
                    .zip(&coercions)
                    .map(|((arg, param), coercion)| coercion_rank(arg, param, coercion))
                    .collect();
                let worst = ranks.iter().copied().max().unwrap_or(0);
                let total: u32 = ranks.iter().sum();
                Some(((worst, total), index, coercions))
            })
            .min_by_key(|(cost, _, _)| *cost)
            .map(|(_, index, coercions)| (index, coercions))
    }

    /// 用户函数调用：名称与参数个数，泛型规则，实参代入
    pub fn function_call(&self, call: &FunctionCall, line: usize) -> TranslateResult<ResolvedCall> {
        let function = match self
            .symbols
            .find_function(self.module, &call.name, Some(call.args.len()))
        {
            Ok(function) => function,
            Err(LookupError::NotFound) => {
                return self.error(TranslateErrorKind::UndefinedFunction(call.name.clone()), line)
            }
            Err(LookupError::WrongArity { expected, found }) => {
                return self.error(
                    TranslateErrorKind::WrongArity {
                        name: call.name.clone(),
                        expected,
                        found,
                    },
                    line,
                )
            }
        };

        if function.is_generic() {
            if call.type_args.is_empty() {
                return self.error(TranslateErrorKind::IsGeneric(call.name.clone()), line);
            }
            if call.type_args.len() != function.generics.len() {
                return self.error(
                    TranslateErrorKind::TypeArgCount {
                        name: call.name.clone(),
                        expected: function.generics.len(),
                        found: call.type_args.len(),
                    },
                    line,
                );
            }
        } else if !call.type_args.is_empty() {
            return self.error(TranslateErrorKind::NotGeneric(call.name.clone()), line);
        }

        let type_args = call
            .type_args
            .iter()
            .map(|arg| self.resolve_type(arg, line))
            .collect::<TranslateResult<Vec<_>>>()?;
        let (params, return_type) = function.instantiate(&type_args);
        Ok(ResolvedCall {
            symbol: function.symbol,
            type_args,
            params,
            return_type,
        })
    }

    /// 宿主方法调用的决议
    pub fn method_call(&self, call: &MethodCall, line: usize) -> TranslateResult<(MemberTarget, SelectedMethod)> {
        let target = self.classify(&call.target)?;
        let args = call
            .args
            .iter()
            .map(|arg| self.type_of(arg))
            .collect::<TranslateResult<Vec<_>>>()?;
        let type_args = call
            .type_args
            .iter()
            .map(|arg| self.resolve_type(arg, line))
            .collect::<TranslateResult<Vec<_>>>()?;
        let selected = self.select_method(&target, &call.name, &args, &type_args, line)?;
        Ok((target, selected))
    }

    fn binary_type(&self, binary: &Binary, line: usize) -> TranslateResult<Type> {
        let left = self.type_of(&binary.left)?;
        let right = self.type_of(&binary.right)?;
        self.binary_result(binary.op, left, right, line)
    }

    /// 已知两侧操作数类型时二元运算的结果类型
    pub fn binary_result(
        &self,
        op_kind: BinaryOp,
        left: Type,
        right: Type,
        line: usize,
    ) -> TranslateResult<Type> {
        let op = op_kind.as_str();
        if left != right {
            return self.error(TranslateErrorKind::TypeMismatch { op, left, right }, line);
        }
        let ty = left;
        let primitive = ty.as_primitive();
        let valid = match op_kind {
            BinaryOp::Add => ty.is_numeric() || ty == Type::STRING,
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => ty.is_numeric(),
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => {
                ty.is_integral() || ty == Type::BOOL
            }
            BinaryOp::ShiftLeft | BinaryOp::ShiftRight => ty.is_integral(),
            BinaryOp::Equal | BinaryOp::NotEqual => !ty.is_void(),
            BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => {
                ty.is_numeric() || primitive == Some(Primitive::Char)
            }
            BinaryOp::LogicalAnd | BinaryOp::LogicalOr => ty == Type::BOOL,
        };
        if !valid {
            return self.error(TranslateErrorKind::InvalidOperand { op, operand: ty }, line);
        }
        if op_kind.is_equality() || op_kind.is_relational() {
            Ok(Type::BOOL)
        } else {
            Ok(ty)
        }
    }

    /// 已知操作数类型时一元运算的结果类型
    pub fn unary_result(&self, op: UnaryOp, operand: Type, line: usize) -> TranslateResult<Type> {
        let valid = match op {
            UnaryOp::Neg => operand.is_numeric(),
            UnaryOp::LogicalNot => operand == Type::BOOL,
            UnaryOp::BitNot => operand.is_integral(),
        };
        if valid {
            Ok(operand)
        } else {
            self.error(
                TranslateErrorKind::InvalidOperand {
                    op: op.as_str(),
                    operand,
                },
                line,
            )
        }
    }

    /// 表达式类型
    pub fn type_of(&self, expr: &Expr) -> TranslateResult<Type> {
        let line = expr.line;
        match &expr.kind {
            ExprKind::Constant(constant) => Ok(constant_type(constant)),
            ExprKind::Identifier(id) => {
                if let Some(variable) = self.ctx.vars.get(&id.name) {
                    return Ok(variable.ty.clone());
                }
                match self.static_type_ref(expr) {
                    Some(ty) => Ok(ty),
                    None => self.error(TranslateErrorKind::UndefinedVariable(id.name.clone()), line),
                }
            }
            ExprKind::Binary(binary) => self.binary_type(binary, line),
            ExprKind::Unary(unary) => {
                let operand = self.type_of(&unary.operand)?;
                self.unary_result(unary.op, operand, line)
            }
            ExprKind::FunctionCall(call) => Ok(self.function_call(call, line)?.return_type),
            ExprKind::MethodCall(call) => Ok(self.method_call(call, line)?.1.method.return_type),
            ExprKind::MemberAccess(access) => {
                if let Some(ty) = self.static_type_ref(expr) {
                    return Ok(ty);
                }
                let target = self.classify(&access.target)?;
                match self.member(&target, &access.member, line)? {
                    Member::EnumValue { ty, .. } => Ok(ty),
                    Member::Field(field) => Ok(field.field_type),
                    Member::Property(property) if !property.has_getter => {
                        self.error(TranslateErrorKind::NoGetter(property.name), line)
                    }
                    Member::Property(property) => Ok(property.property_type),
                    Member::Nested(ty) => Ok(ty),
                }
            }
            ExprKind::IndexAccess(access) => {
                let target = self.type_of(&access.target)?;
                let index = self.type_of(&access.index)?;
                let element = match &target {
                    Type::Primitive(Primitive::String) => Type::CHAR,
                    Type::Array(element) => (**element).clone(),
                    _ => return self.error(TranslateErrorKind::NotIndexable(target), line),
                };
                if index != Type::INT {
                    return self.error(TranslateErrorKind::IndexNotInt(index), line);
                }
                Ok(element)
            }
            ExprKind::Cast(cast) => self.resolve_type(&cast.type_name, line),
            ExprKind::New(new) => self.resolve_type(&new.type_name, line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::lexer::tokenize;
    use crate::compiler::parser::{Parser, StmtKind};
    use crate::host::HostRegistry;
    use std::collections::HashMap;

    fn expr(source: &str) -> Expr {
        let (tokens, errors) = tokenize(&format!("{source};"));
        assert!(errors.is_empty());
        let (module, errors) = Parser::new(&tokens).parse();
        assert!(errors.is_empty(), "{errors:?}");
        match &module.statements[0].kind {
            StmtKind::Expr(stmt) => stmt.expression.clone(),
            other => panic!("expected expression, got {other:?}"),
        }
    }

    fn setup() -> (HostRegistry, ModuleTable, TranslationContext) {
        let mut symbols = ModuleTable::new("main");
        let root = symbols.root();
        symbols.add_import(root, "System");
        symbols.add_import(root, "System.Collections.Generic");
        let ctx = TranslationContext::new("f", Type::VOID, HashMap::new(), 64);
        (HostRegistry::standard(), symbols, ctx)
    }

    #[test]
    fn test_binary_types() {
        let (host, symbols, ctx) = setup();
        let resolver = TypeResolver::new(&host, &symbols, symbols.root(), &ctx);
        assert_eq!(resolver.type_of(&expr("1 + 2 * 3")).unwrap(), Type::INT);
        assert_eq!(resolver.type_of(&expr("1 < 2")).unwrap(), Type::BOOL);
        assert_eq!(resolver.type_of(&expr("\"a\" + \"b\"")).unwrap(), Type::STRING);
        assert_eq!(resolver.type_of(&expr("'a' <= 'b'")).unwrap(), Type::BOOL);

        let err = resolver.type_of(&expr("1 + 1.0")).unwrap_err();
        assert!(matches!(err.kind, TranslateErrorKind::TypeMismatch { .. }));
        let err = resolver.type_of(&expr("true + false")).unwrap_err();
        assert!(matches!(err.kind, TranslateErrorKind::InvalidOperand { .. }));
        let err = resolver.type_of(&expr("1 && 2")).unwrap_err();
        assert!(matches!(err.kind, TranslateErrorKind::InvalidOperand { .. }));
    }

    #[test]
    fn test_resolve_type_names() {
        let (host, symbols, mut ctx) = setup();
        ctx.generics.insert(
            "T".into(),
            Type::Generic {
                index: 0,
                name: "T".into(),
            },
        );
        let resolver = TypeResolver::new(&host, &symbols, symbols.root(), &ctx);
        let list = TypeName::Named {
            name: "List".into(),
            args: vec![TypeName::named("T")],
        };
        assert_eq!(
            resolver.resolve_type(&TypeName::array_of(list), 1).unwrap().to_string(),
            "List<T>[]"
        );
        assert_eq!(
            resolver.resolve_type(&TypeName::named("Int32"), 1).unwrap(),
            Type::INT
        );
        assert!(matches!(
            resolver.resolve_type(&TypeName::named("Nope"), 3).unwrap_err().kind,
            TranslateErrorKind::UndefinedType(_)
        ));
    }

    #[test]
    fn test_members_and_methods() {
        let (host, symbols, ctx) = setup();
        let resolver = TypeResolver::new(&host, &symbols, symbols.root(), &ctx);
        assert_eq!(
            resolver.type_of(&expr("ConsoleColor.Red")).unwrap(),
            Type::host("System.ConsoleColor")
        );
        assert_eq!(resolver.type_of(&expr("Math.PI")).unwrap(), Type::DOUBLE);
        assert_eq!(
            resolver.type_of(&expr("\"abc\".Substring(1)")).unwrap(),
            Type::STRING
        );
        assert_eq!(
            resolver.type_of(&expr("Environment.SpecialFolder.Desktop")).unwrap(),
            Type::host("System.Environment+SpecialFolder")
        );
        assert_eq!(
            resolver.type_of(&expr("Array.Empty<int>()")).unwrap(),
            Type::array_of(Type::INT)
        );
        let err = resolver.type_of(&expr("Array.Empty()")).unwrap_err();
        assert_eq!(err.kind, TranslateErrorKind::IsGeneric("Empty".into()));
        let err = resolver.type_of(&expr("Math.Sqrt<int>(2.0d)")).unwrap_err();
        assert_eq!(err.kind, TranslateErrorKind::NotGeneric("Sqrt".into()));
    }

    #[test]
    fn test_overload_exact_before_compatible() {
        let (host, symbols, ctx) = setup();
        let resolver = TypeResolver::new(&host, &symbols, symbols.root(), &ctx);
        let console = MemberTarget::Static(Type::host("System.Console"));

        let exact = resolver
            .select_method(&console, "WriteLine", &[Type::INT], &[], 1)
            .unwrap();
        assert_eq!(exact.method.params, vec![Type::INT]);
        assert_eq!(exact.coercions, vec![Coercion::Identity]);

        let math = MemberTarget::Static(Type::host("System.Math"));
        let compatible = resolver
            .select_method(&math, "Sqrt", &[Type::INT], &[], 1)
            .unwrap();
        assert_eq!(compatible.coercions, vec![Coercion::Conv(ConvKind::R8)]);

        // float 拓宽到 double，而不是收窄到先声明的 int
        let abs = resolver
            .select_method(&math, "Abs", &[Type::FLOAT], &[], 1)
            .unwrap();
        assert_eq!(abs.method.params, vec![Type::DOUBLE]);
        assert_eq!(abs.coercions, vec![Coercion::Conv(ConvKind::R8)]);

        // 拓宽优先于装箱到 object
        let short = Type::Primitive(Primitive::Short);
        let widened = resolver
            .select_method(&console, "WriteLine", &[short], &[], 1)
            .unwrap();
        assert_eq!(widened.method.params, vec![Type::INT]);
        assert_eq!(widened.coercions, vec![Coercion::Conv(ConvKind::I4)]);

        // 两个实参都拓宽，胜过两个都收窄
        let narrowed = resolver
            .select_method(&math, "Max", &[Type::LONG, Type::LONG], &[], 1)
            .unwrap();
        assert_eq!(narrowed.method.params, vec![Type::DOUBLE, Type::DOUBLE]);

        let boxed = resolver
            .select_method(&console, "WriteLine", &[Type::host("System.DateTime")], &[], 1)
            .unwrap();
        assert_eq!(boxed.method.params, vec![Type::OBJECT]);
        assert_eq!(
            boxed.coercions,
            vec![Coercion::Box(Type::host("System.DateTime"))]
        );
    }

    #[test]
    fn test_index_access() {
        let (host, symbols, ctx) = setup();
        let resolver = TypeResolver::new(&host, &symbols, symbols.root(), &ctx);
        assert_eq!(resolver.type_of(&expr("\"abc\"[0]")).unwrap(), Type::CHAR);
        assert!(matches!(
            resolver.type_of(&expr("\"abc\"[1l]")).unwrap_err().kind,
            TranslateErrorKind::IndexNotInt(_)
        ));
        assert!(matches!(
            resolver.type_of(&expr("5[0]")).unwrap_err().kind,
            TranslateErrorKind::NotIndexable(_)
        ));
    }
}
