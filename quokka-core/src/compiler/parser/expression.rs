//! 表达式解析
//!
//! 二元运算使用优先级爬升（见 `utils::get_precedence`），一元与后缀运算递归下降。

use super::super::lexer::token_kind::QuokkaTokenKind;
use super::super::lexer::Token;
use super::error::{ParseResult, ParserError, ParserErrorKind};
use super::expr::{
    Binary, BinaryOp, Cast, Constant, Expr, ExprKind, ExprNode, FunctionCall, Identifier,
    IndexAccess, MemberAccess, MethodCall, NewObject, Unary, UnaryOp,
};
use super::parser::Parser;
use super::type_name::TypeName;
use super::utils::{binary_op, get_precedence};

/// 能作为强制转换操作数开头的 token
fn starts_operand(kind: QuokkaTokenKind) -> bool {
    matches!(
        kind,
        QuokkaTokenKind::Identifier
            | QuokkaTokenKind::LiteralInteger
            | QuokkaTokenKind::LiteralFloat
            | QuokkaTokenKind::LiteralString
            | QuokkaTokenKind::LiteralChar
            | QuokkaTokenKind::True
            | QuokkaTokenKind::False
            | QuokkaTokenKind::LeftParenthesis
            | QuokkaTokenKind::Exclamation
            | QuokkaTokenKind::Tilde
            | QuokkaTokenKind::New
    )
}

/// 拆分数字文本与后缀：`"12ub"` -> `("12", "ub")`
fn split_suffix(text: &str) -> (&str, &str) {
    let index = text
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    text.split_at(index)
}

impl<'a> Parser<'a> {
    /// 解析完整表达式
    pub fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_binary(0)
    }

    /// 当前位置的二元运算符及其占用的 token 数
    fn peek_binary_op(&self) -> Option<(BinaryOp, usize)> {
        let token = self.current();
        if token.kind == QuokkaTokenKind::GreaterThan {
            // 相邻的 `>` `>` 视为右移
            let next = self.peek(1);
            if next.kind == QuokkaTokenKind::GreaterThan
                && next.coordinate.line == token.coordinate.line
                && next.coordinate.column == token.coordinate.column + 1
            {
                return Some((BinaryOp::ShiftRight, 2));
            }
        }
        binary_op(token.kind).map(|op| (op, 1))
    }

    /// 优先级爬升
    fn parse_binary(&mut self, min_precedence: u8) -> ParseResult<Expr> {
        self.nested(|p| p.parse_binary_chain(min_precedence))
    }

    /// 循环构造的左结合链：每并入一个运算符，左侧就深一层
    fn parse_binary_chain(&mut self, min_precedence: u8) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        let mut previous_equality = false;

        while let Some((op, width)) = self.peek_binary_op() {
            let precedence = get_precedence(op);
            if precedence <= min_precedence {
                break;
            }
            // 相等运算不可结合
            if op.is_equality() && previous_equality {
                return Err(self.error_here(ParserErrorKind::ChainedEquality));
            }
            for _ in 0..width {
                self.consume();
            }
            self.deepen()?;
            let right = self.parse_binary(precedence)?;
            let line = left.line;
            previous_equality = op.is_equality();
            left = ExprNode::new(ExprKind::Binary(Binary { left, op, right }), line);
        }

        Ok(left)
    }

    /// 解析一元表达式
    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let token = self.current();
        let op = match token.kind {
            QuokkaTokenKind::Minus => UnaryOp::Neg,
            QuokkaTokenKind::Exclamation => UnaryOp::LogicalNot,
            QuokkaTokenKind::Tilde => UnaryOp::BitNot,
            _ => return self.parse_postfix_expression(),
        };

        // 负数字面量直接折叠为常量，使 `-2147483648` 这类边界值可以表示
        if op == UnaryOp::Neg
            && matches!(
                self.peek_kind(1),
                QuokkaTokenKind::LiteralInteger | QuokkaTokenKind::LiteralFloat
            )
            && !matches!(
                self.peek_kind(2),
                QuokkaTokenKind::Dot | QuokkaTokenKind::LeftSquareBracket
            )
        {
            self.consume();
            let literal = self.consume();
            let constant = Self::parse_number(literal, true)?;
            return Ok(ExprNode::new(ExprKind::Constant(constant), token.line()));
        }

        self.consume();
        let operand = self.nested(|p| p.parse_unary())?;
        Ok(ExprNode::new(
            ExprKind::Unary(Unary { op, operand }),
            token.line(),
        ))
    }

    /// 解析后缀：`.member`、`.method<T>(args)`、`[index]`
    fn parse_postfix_expression(&mut self) -> ParseResult<Expr> {
        self.chained(|p| p.parse_postfix_chain())
    }

    fn parse_postfix_chain(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if matches!(
                self.current().kind,
                QuokkaTokenKind::Dot | QuokkaTokenKind::LeftSquareBracket
            ) {
                self.deepen()?;
            }
            if self.match_token(QuokkaTokenKind::Dot) {
                let line = self.current_line();
                let name = self.expect_identifier()?;
                let type_args = if self.check(QuokkaTokenKind::LessThan) {
                    self.try_call_type_args()
                } else {
                    None
                };
                expr = if type_args.is_some() || self.check(QuokkaTokenKind::LeftParenthesis) {
                    let args = self.parse_arguments()?;
                    ExprNode::new(
                        ExprKind::MethodCall(MethodCall {
                            target: expr,
                            name,
                            args,
                            type_args: type_args.unwrap_or_default(),
                        }),
                        line,
                    )
                } else {
                    ExprNode::new(
                        ExprKind::MemberAccess(MemberAccess {
                            target: expr,
                            member: name,
                        }),
                        line,
                    )
                };
            } else if self.check(QuokkaTokenKind::LeftSquareBracket) {
                let line = self.consume().line();
                let index = self.parse_expression()?;
                self.expect(QuokkaTokenKind::RightSquareBracket)?;
                expr = ExprNode::new(
                    ExprKind::IndexAccess(IndexAccess {
                        target: expr,
                        index,
                    }),
                    line,
                );
            } else {
                break;
            }
        }
        Ok(expr)
    }

    /// 解析基础表达式
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.current();
        let line = token.line();
        let constant = match token.kind {
            QuokkaTokenKind::LiteralInteger | QuokkaTokenKind::LiteralFloat => {
                self.consume();
                Self::parse_number(token, false)?
            }
            QuokkaTokenKind::LiteralString => {
                self.consume();
                Constant::String(token.text.clone())
            }
            QuokkaTokenKind::LiteralChar => {
                self.consume();
                Constant::Char(token.text.chars().next().unwrap_or_default())
            }
            QuokkaTokenKind::True | QuokkaTokenKind::False => {
                self.consume();
                Constant::Bool(token.kind == QuokkaTokenKind::True)
            }
            QuokkaTokenKind::Identifier => return self.parse_identifier_expression(),
            QuokkaTokenKind::New => return self.parse_new(),
            QuokkaTokenKind::LeftParenthesis => return self.parse_parenthesized(),
            _ => return Err(self.unexpected("expression")),
        };
        Ok(ExprNode::new(ExprKind::Constant(constant), line))
    }

    /// 按后缀把数字字面量转换为常量
    fn parse_number(token: &Token, negative: bool) -> ParseResult<Constant> {
        let (digits, suffix) = split_suffix(&token.text);
        let digits = if negative {
            format!("-{digits}")
        } else {
            digits.to_string()
        };
        let invalid = || {
            let text = if negative {
                format!("-{}", token.text)
            } else {
                token.text.clone()
            };
            ParserError::here(ParserErrorKind::InvalidNumberFormat(text), token.coordinate)
        };
        let is_decimal = token.kind == QuokkaTokenKind::LiteralFloat;

        let constant = match (suffix, is_decimal) {
            ("", false) => Constant::Int(digits.parse().map_err(|_| invalid())?),
            ("b", false) => Constant::SByte(digits.parse().map_err(|_| invalid())?),
            ("ub", false) => Constant::Byte(digits.parse().map_err(|_| invalid())?),
            ("s", false) => Constant::Short(digits.parse().map_err(|_| invalid())?),
            ("us", false) => Constant::UShort(digits.parse().map_err(|_| invalid())?),
            ("u", false) => Constant::UInt(digits.parse().map_err(|_| invalid())?),
            ("l", false) => Constant::Long(digits.parse().map_err(|_| invalid())?),
            ("ul", false) => Constant::ULong(digits.parse().map_err(|_| invalid())?),
            ("", true) | ("f", _) => Constant::Float(digits.parse().map_err(|_| invalid())?),
            ("d", _) => Constant::Double(digits.parse().map_err(|_| invalid())?),
            _ => return Err(invalid()),
        };
        Ok(constant)
    }

    /// 标识符、函数调用 `f(..)` 或泛型调用 `f<T>(..)`
    fn parse_identifier_expression(&mut self) -> ParseResult<Expr> {
        let token = self.consume();
        let line = token.line();
        let name = token.text.clone();

        if self.check(QuokkaTokenKind::LeftParenthesis) {
            let args = self.parse_arguments()?;
            return Ok(ExprNode::new(
                ExprKind::FunctionCall(FunctionCall {
                    name,
                    args,
                    type_args: Vec::new(),
                }),
                line,
            ));
        }

        if self.check(QuokkaTokenKind::LessThan) {
            if let Some(type_args) = self.try_call_type_args() {
                let args = self.parse_arguments()?;
                return Ok(ExprNode::new(
                    ExprKind::FunctionCall(FunctionCall {
                        name,
                        args,
                        type_args,
                    }),
                    line,
                ));
            }
        }

        Ok(ExprNode::new(
            ExprKind::Identifier(Identifier { name }),
            line,
        ))
    }

    /// 试探解析 `<T, ...>` 且其后紧跟 `(`；失败时恢复游标，`i < 5` 保持为比较
    fn try_call_type_args(&mut self) -> Option<Vec<TypeName>> {
        let saved = self.save();
        match self.parse_type_args() {
            Ok(type_args) if self.check(QuokkaTokenKind::LeftParenthesis) => Some(type_args),
            _ => {
                self.restore(saved);
                None
            }
        }
    }

    /// `(a, b, c)`
    fn parse_arguments(&mut self) -> ParseResult<Vec<Expr>> {
        self.expect(QuokkaTokenKind::LeftParenthesis)?;
        let mut args = Vec::new();
        if !self.check(QuokkaTokenKind::RightParenthesis) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(QuokkaTokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(QuokkaTokenKind::RightParenthesis)?;
        Ok(args)
    }

    /// `new T(args)`，数组为 `new T[](length)`
    fn parse_new(&mut self) -> ParseResult<Expr> {
        let line = self.expect(QuokkaTokenKind::New)?.line();
        let type_name = self.parse_type_name()?;
        let args = self.parse_arguments()?;
        Ok(ExprNode::new(
            ExprKind::New(NewObject { type_name, args }),
            line,
        ))
    }

    /// 括号：先尝试 `(Type) operand` 强制转换，失败则恢复游标按分组解析
    fn parse_parenthesized(&mut self) -> ParseResult<Expr> {
        if let Some(cast) = self.try_cast() {
            return Ok(cast);
        }
        self.expect(QuokkaTokenKind::LeftParenthesis)?;
        let expr = self.parse_expression()?;
        self.expect(QuokkaTokenKind::RightParenthesis)?;
        Ok(expr)
    }

    fn try_cast(&mut self) -> Option<Expr> {
        if self.peek_kind(1) != QuokkaTokenKind::Identifier {
            return None;
        }
        let saved = self.save();
        let line = self.consume().line();

        let type_name = match self.parse_type_name() {
            Ok(type_name) => type_name,
            Err(_) => {
                self.restore(saved);
                return None;
            }
        };
        if !self.match_token(QuokkaTokenKind::RightParenthesis)
            || !starts_operand(self.current().kind)
        {
            self.restore(saved);
            return None;
        }

        match self.parse_unary() {
            Ok(value) => Some(ExprNode::new(
                ExprKind::Cast(Cast { type_name, value }),
                line,
            )),
            Err(_) => {
                self.restore(saved);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::lexer::tokenize;

    fn parse_expr(code: &str) -> ParseResult<Expr> {
        let (tokens, errors) = tokenize(code);
        assert!(errors.is_empty(), "lexer errors: {errors:?}");
        let mut parser = Parser::new(&tokens);
        parser.parse_expression()
    }

    fn render(code: &str) -> String {
        parse_expr(code).unwrap().to_string()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(render("1 + 2 * 3"), "(1 + (2 * 3))");
        assert_eq!(render("a || b && c | d ^ e & f"), "(a || (b && (c | (d ^ (e & f)))))");
        assert_eq!(render("a < b == c > d"), "((a < b) == (c > d))");
        assert_eq!(render("1 << 2 + 3"), "(1 << (2 + 3))");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(render("1 - 2 - 3"), "((1 - 2) - 3)");
        assert_eq!(render("8 / 4 % 3"), "((8 / 4) % 3)");
    }

    #[test]
    fn test_chained_equality_rejected() {
        let err = parse_expr("a == b != c").unwrap_err();
        assert_eq!(err.kind, ParserErrorKind::ChainedEquality);
        assert_eq!(render("(a == b) != c"), "((a == b) != c)");
    }

    #[test]
    fn test_right_shift_from_two_tokens() {
        assert_eq!(render("a >> 2"), "(a >> 2)");
        assert!(parse_expr("a > > 2").is_err());
    }

    #[test]
    fn test_unary_and_negative_literals() {
        assert_eq!(render("-x * 2"), "((-x) * 2)");
        assert_eq!(render("!~x"), "(!(~x))");
        let expr = parse_expr("-2147483648").unwrap();
        assert_eq!(expr.kind, ExprKind::Constant(Constant::Int(i32::MIN)));
    }

    #[test]
    fn test_literal_suffixes() {
        let cases = [
            ("5b", Constant::SByte(5)),
            ("5ub", Constant::Byte(5)),
            ("5us", Constant::UShort(5)),
            ("5ul", Constant::ULong(5)),
            ("1.5", Constant::Float(1.5)),
            ("1.5d", Constant::Double(1.5)),
            ("'c'", Constant::Char('c')),
        ];
        for (code, expected) in cases {
            assert_eq!(parse_expr(code).unwrap().kind, ExprKind::Constant(expected));
        }
        let err = parse_expr("300ub").unwrap_err();
        assert!(matches!(err.kind, ParserErrorKind::InvalidNumberFormat(_)));
    }

    #[test]
    fn test_cast_versus_grouping() {
        assert!(matches!(parse_expr("(int) x").unwrap().kind, ExprKind::Cast(_)));
        assert!(matches!(parse_expr("(float)(a + b)").unwrap().kind, ExprKind::Cast(_)));
        // `-` 不作为转换操作数开头
        assert_eq!(render("(a) - b"), "(a - b)");
        assert_eq!(render("(a)"), "a");
        assert_eq!(render("(int[]) o"), "((int[]) o)");
    }

    #[test]
    fn test_generic_call_versus_comparison() {
        assert_eq!(render("id<int>(5)"), "id<int>(5)");
        assert_eq!(render("i < 5"), "(i < 5)");
        assert_eq!(render("a < b > (c)"), "a<b>(c)");
        assert_eq!(render("i < n && j > 0"), "((i < n) && (j > 0))");
    }

    #[test]
    fn test_postfix_chain() {
        assert_eq!(render("Console.WriteLine(s[0])"), "Console.WriteLine(s[0])");
        assert_eq!(
            render("Array.Empty<List<int>>().Length"),
            "Array.Empty<List<int>>().Length"
        );
        assert!(matches!(
            parse_expr("a.b.c").unwrap().kind,
            ExprKind::MemberAccess(_)
        ));
    }

    #[test]
    fn test_new_expressions() {
        assert_eq!(render("new List<int>()"), "new List<int>()");
        assert_eq!(render("new int[](10)"), "new int[](10)");
    }

    #[test]
    fn test_missing_operand_at_eof() {
        let err = parse_expr("1 +").unwrap_err();
        assert_eq!(err.kind, ParserErrorKind::UnexpectedEndOfInput);
    }
}
