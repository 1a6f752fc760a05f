use super::super::lexer::token_kind::QuokkaTokenKind;
use super::super::lexer::{Token, TokenStream};
use super::error::{expected_identifier, unexpected_token, ParseResult, ParserError, ParserErrorKind};
use super::expr::{ExprKind, ExprNode, Identifier};
use super::module::{Module, ModuleKind};
use super::stmt::{
    AssignStmt, BlockStmt, BranchStmt, CompoundStmt, ConditionArm, DoWhileStmt, ExprStmt,
    ForStmt, FunctionDecl, ImportStmt, ReturnStmt, Stmt, StmtKind, StmtNode, VarDeclStmt,
    WhileStmt,
};
use super::type_name::TypeName;
use quokka_config::LimitConfig;
use tracing::{debug, trace};

/// 递归下降语法分析器
///
/// 基于可回退的 token 游标：强制转换与泛型调用的歧义通过保存/恢复游标解决。
/// 语法错误只中止当前语句，记录后同步到下一条语句继续分析。
pub struct Parser<'a> {
    tokens: &'a TokenStream,
    pos: usize,
    depth: usize,
    max_depth: usize,
    errors: Vec<ParserError>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenStream) -> Self {
        Self::with_limits(tokens, &LimitConfig::default())
    }

    pub fn with_limits(tokens: &'a TokenStream, limits: &LimitConfig) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            max_depth: limits.max_nesting_depth,
            errors: Vec::new(),
        }
    }

    /// 解析整个模块，返回语法树与收集到的全部语法错误
    pub fn parse(mut self) -> (Module, Vec<ParserError>) {
        let statements = self.parse_statement_list(QuokkaTokenKind::Eof);
        debug!(
            target: "quokka::parser",
            statements = statements.len(),
            errors = self.errors.len(),
            "Parse finished"
        );
        (Box::new(ModuleKind { statements }), self.errors)
    }

    // ==================== 游标 ====================

    pub(super) fn current(&self) -> &'a Token {
        self.tokens.get(self.pos)
    }

    pub(super) fn peek(&self, offset: usize) -> &'a Token {
        self.tokens.get(self.pos + offset)
    }

    pub(super) fn peek_kind(&self, offset: usize) -> QuokkaTokenKind {
        self.peek(offset).kind
    }

    pub(super) fn save(&self) -> usize {
        self.pos
    }

    pub(super) fn restore(&mut self, saved: usize) {
        trace!(target: "quokka::parser", from = self.pos, to = saved, "Backtrack");
        self.pos = saved;
    }

    /// 消费当前token并返回它
    pub(super) fn consume(&mut self) -> &'a Token {
        let token = self.current();
        if token.kind != QuokkaTokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// 检查当前token是否为指定类型
    pub(super) fn check(&self, kind: QuokkaTokenKind) -> bool {
        self.current().kind == kind
    }

    /// 匹配并消费指定类型的token
    pub(super) fn match_token(&mut self, kind: QuokkaTokenKind) -> bool {
        if self.check(kind) {
            self.consume();
            true
        } else {
            false
        }
    }

    pub(super) fn current_line(&self) -> usize {
        self.current().line()
    }

    /// 获取当前token的文本表示
    fn current_token_text(&self) -> String {
        let token = self.current();
        match token.kind {
            QuokkaTokenKind::Eof => "EOF".to_string(),
            QuokkaTokenKind::LiteralString => format!("\"{}\"", token.text),
            _ => token.text.clone(),
        }
    }

    /// 创建带有当前位置的错误
    pub(super) fn error_here(&self, kind: ParserErrorKind) -> ParserError {
        let token = self.current();
        if token.kind == QuokkaTokenKind::Eof {
            ParserError::at_eof(kind)
        } else {
            ParserError::here(kind, token.coordinate)
        }
    }

    /// 当前token与期望不符的错误
    pub(super) fn unexpected(&self, expected: &str) -> ParserError {
        if self.check(QuokkaTokenKind::Eof) {
            return ParserError::at_eof(ParserErrorKind::UnexpectedEndOfInput);
        }
        self.error_here(unexpected_token(self.current_token_text(), vec![expected]))
    }

    /// 期望并消费指定类型的token，否则返回错误
    pub(super) fn expect(&mut self, kind: QuokkaTokenKind) -> ParseResult<&'a Token> {
        if self.check(kind) {
            Ok(self.consume())
        } else {
            Err(self.unexpected(kind.as_str()))
        }
    }

    /// 期望一个标识符，返回其名称
    pub(super) fn expect_identifier(&mut self) -> ParseResult<String> {
        if self.check(QuokkaTokenKind::Identifier) {
            Ok(self.consume().text.clone())
        } else if self.check(QuokkaTokenKind::Eof) {
            Err(ParserError::at_eof(ParserErrorKind::UnexpectedEndOfInput))
        } else {
            Err(self.error_here(expected_identifier(self.current_token_text())))
        }
    }

    /// 在嵌套深度限制内执行
    pub(super) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        self.chained(|p| {
            p.deepen()?;
            f(p)
        })
    }

    /// 执行循环构造的左结合链，结束后恢复进入前的深度
    ///
    /// 链中每次调用 [`Parser::deepen`] 都让语法树加深一层。
    pub(super) fn chained<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let depth = self.depth;
        let result = f(self);
        self.depth = depth;
        result
    }

    /// 深度加一，超过限制时报错
    pub(super) fn deepen(&mut self) -> ParseResult<()> {
        if self.depth >= self.max_depth {
            return Err(self.error_here(ParserErrorKind::NestingTooDeep(self.max_depth)));
        }
        self.depth += 1;
        Ok(())
    }

    // ==================== 错误恢复 ====================

    fn report(&mut self, err: ParserError) {
        debug!(target: "quokka::parser", error = %err, "Syntax error");
        self.errors.push(err);
    }

    /// 跳到下一条语句的开始：`;` 之后，或 `}`、终止符、语句关键字之前
    fn synchronize(&mut self, terminator: QuokkaTokenKind, start: usize) {
        loop {
            let kind = self.current().kind;
            if kind == QuokkaTokenKind::Eof
                || kind == terminator
                || kind == QuokkaTokenKind::RightCurlyBrace
            {
                break;
            }
            if kind == QuokkaTokenKind::Semicolon {
                self.consume();
                break;
            }
            if kind.starts_statement() && self.pos > start {
                break;
            }
            self.consume();
        }
        // 保证前进，避免在同一位置反复报错
        if self.pos == start && !self.check(terminator) && !self.check(QuokkaTokenKind::Eof) {
            self.consume();
        }
    }

    // ==================== 语句 ====================

    /// 解析语句列表直到 `terminator`（不消费终止符）
    fn parse_statement_list(&mut self, terminator: QuokkaTokenKind) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.check(terminator) && !self.check(QuokkaTokenKind::Eof) {
            // 跳过分号（空语句）
            if self.match_token(QuokkaTokenKind::Semicolon) {
                continue;
            }
            let start = self.pos;
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    self.report(err);
                    self.synchronize(terminator, start);
                }
            }
        }
        statements
    }

    /// 解析单个语句
    fn parse_statement(&mut self) -> ParseResult<Stmt> {
        match self.current().kind {
            QuokkaTokenKind::LeftCurlyBrace => self.parse_block(),
            QuokkaTokenKind::Func => self.parse_function(),
            QuokkaTokenKind::Return => self.parse_return_statement(),
            QuokkaTokenKind::Let => {
                let stmt = self.parse_let()?;
                self.expect(QuokkaTokenKind::Semicolon)?;
                Ok(stmt)
            }
            QuokkaTokenKind::If => self.parse_branch(),
            QuokkaTokenKind::While => self.parse_while_loop(),
            QuokkaTokenKind::Do => self.parse_do_while_loop(),
            QuokkaTokenKind::For => self.parse_for_loop(),
            QuokkaTokenKind::Break | QuokkaTokenKind::Continue => {
                let token = self.consume();
                self.expect(QuokkaTokenKind::Semicolon)?;
                let kind = if token.kind == QuokkaTokenKind::Break {
                    StmtKind::Break
                } else {
                    StmtKind::Continue
                };
                Ok(StmtNode::new(kind, token.line()))
            }
            QuokkaTokenKind::Import => self.parse_import_statement(),
            QuokkaTokenKind::Identifier | QuokkaTokenKind::New => {
                let stmt = self.parse_expression_statement()?;
                self.expect(QuokkaTokenKind::Semicolon)?;
                Ok(stmt)
            }
            _ => Err(self.unexpected("statement")),
        }
    }

    /// 解析代码块
    pub(super) fn parse_block(&mut self) -> ParseResult<Stmt> {
        let line = self.expect(QuokkaTokenKind::LeftCurlyBrace)?.line();
        let statements =
            self.nested(|p| Ok(p.parse_statement_list(QuokkaTokenKind::RightCurlyBrace)))?;
        self.expect(QuokkaTokenKind::RightCurlyBrace)?;
        Ok(StmtNode::new(StmtKind::Block(BlockStmt { statements }), line))
    }

    /// `func name<T, U>(a: T, b: int): Ret { ... }`
    fn parse_function(&mut self) -> ParseResult<Stmt> {
        let line = self.expect(QuokkaTokenKind::Func)?.line();
        let name = self.expect_identifier()?;

        let mut generics: Vec<String> = Vec::new();
        if self.match_token(QuokkaTokenKind::LessThan) {
            loop {
                let coordinate = self.current().coordinate;
                let generic = self.expect_identifier()?;
                if generics.contains(&generic) {
                    return Err(ParserError::here(
                        ParserErrorKind::DuplicateGenericParameter(generic),
                        coordinate,
                    ));
                }
                generics.push(generic);
                if !self.match_token(QuokkaTokenKind::Comma) {
                    break;
                }
            }
            self.expect(QuokkaTokenKind::GreaterThan)?;
        }

        self.expect(QuokkaTokenKind::LeftParenthesis)?;
        let mut args: Vec<(String, TypeName)> = Vec::new();
        if !self.check(QuokkaTokenKind::RightParenthesis) {
            loop {
                let coordinate = self.current().coordinate;
                let arg = self.expect_identifier()?;
                if args.iter().any(|(existing, _)| *existing == arg) {
                    return Err(ParserError::here(
                        ParserErrorKind::DuplicateArgument(arg),
                        coordinate,
                    ));
                }
                self.expect(QuokkaTokenKind::Colon)?;
                let type_name = self.parse_type_name()?;
                args.push((arg, type_name));
                if !self.match_token(QuokkaTokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(QuokkaTokenKind::RightParenthesis)?;

        let return_type = if self.match_token(QuokkaTokenKind::Colon) {
            self.parse_type_name()?
        } else {
            TypeName::void()
        };

        let body = self.parse_block()?;
        trace!(target: "quokka::parser", function = %name, "Parsed function");
        Ok(StmtNode::new(
            StmtKind::Function(FunctionDecl {
                name,
                return_type,
                args,
                generics,
                body,
            }),
            line,
        ))
    }

    /// 解析 return 语句
    fn parse_return_statement(&mut self) -> ParseResult<Stmt> {
        let line = self.expect(QuokkaTokenKind::Return)?.line();
        let value = if self.check(QuokkaTokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(QuokkaTokenKind::Semicolon)?;
        Ok(StmtNode::new(StmtKind::Return(ReturnStmt { value }), line))
    }

    /// `let x: T` 或 `let x: T = e`（不含分号）
    ///
    /// 带初始值时展开为 `Compound(VarDecl, Assign)`。
    fn parse_let(&mut self) -> ParseResult<Stmt> {
        let line = self.expect(QuokkaTokenKind::Let)?.line();
        let name = self.expect_identifier()?;
        self.expect(QuokkaTokenKind::Colon)?;
        let type_name = self.parse_type_name()?;
        let decl = StmtNode::new(
            StmtKind::VarDecl(VarDeclStmt {
                name: name.clone(),
                type_name,
            }),
            line,
        );

        if !self.match_token(QuokkaTokenKind::Equal) {
            return Ok(decl);
        }
        let value = self.parse_expression()?;
        let assign = StmtNode::new(
            StmtKind::Assign(AssignStmt {
                destination: ExprNode::new(ExprKind::Identifier(Identifier { name }), line),
                value,
            }),
            line,
        );
        Ok(StmtNode::new(
            StmtKind::Compound(CompoundStmt {
                first: decl,
                second: assign,
            }),
            line,
        ))
    }

    /// 以标识符或 `new` 开头的语句：表达式或赋值（不含分号）
    fn parse_expression_statement(&mut self) -> ParseResult<Stmt> {
        let line = self.current_line();
        let coordinate = self.current().coordinate;
        let expression = self.parse_expression()?;

        if !self.match_token(QuokkaTokenKind::Equal) {
            return Ok(StmtNode::new(StmtKind::Expr(ExprStmt { expression }), line));
        }

        match expression.kind {
            ExprKind::Identifier(_) | ExprKind::IndexAccess(_) | ExprKind::MemberAccess(_) => {}
            _ => {
                return Err(ParserError::here(
                    ParserErrorKind::InvalidAssignmentTarget(expression.to_string()),
                    coordinate,
                ))
            }
        }
        let value = self.parse_expression()?;
        Ok(StmtNode::new(
            StmtKind::Assign(AssignStmt {
                destination: expression,
                value,
            }),
            line,
        ))
    }

    /// for 循环头部中的简单语句：`let` 或表达式/赋值
    fn parse_simple_statement(&mut self) -> ParseResult<Stmt> {
        match self.current().kind {
            QuokkaTokenKind::Let => self.parse_let(),
            QuokkaTokenKind::Identifier | QuokkaTokenKind::New => {
                self.parse_expression_statement()
            }
            _ => Err(self.unexpected("statement")),
        }
    }

    /// `( expr )`
    fn parse_condition(&mut self) -> ParseResult<super::expr::Expr> {
        self.expect(QuokkaTokenKind::LeftParenthesis)?;
        let condition = self.parse_expression()?;
        self.expect(QuokkaTokenKind::RightParenthesis)?;
        Ok(condition)
    }

    /// if / else if / else，所有分支收集到同一个节点
    fn parse_branch(&mut self) -> ParseResult<Stmt> {
        let line = self.expect(QuokkaTokenKind::If)?.line();
        let mut arms = Vec::new();
        let mut else_body = None;

        let condition = self.parse_condition()?;
        let body = self.parse_block()?;
        arms.push(ConditionArm { condition, body });

        while self.match_token(QuokkaTokenKind::Else) {
            if self.match_token(QuokkaTokenKind::If) {
                let condition = self.parse_condition()?;
                let body = self.parse_block()?;
                arms.push(ConditionArm { condition, body });
            } else {
                else_body = Some(self.parse_block()?);
                break;
            }
        }

        Ok(StmtNode::new(
            StmtKind::Branch(BranchStmt { arms, else_body }),
            line,
        ))
    }

    fn parse_while_loop(&mut self) -> ParseResult<Stmt> {
        let line = self.expect(QuokkaTokenKind::While)?.line();
        let condition = self.parse_condition()?;
        let body = self.parse_block()?;
        Ok(StmtNode::new(
            StmtKind::While(WhileStmt { condition, body }),
            line,
        ))
    }

    /// `do { ... } while (cond)`，结尾分号可选
    fn parse_do_while_loop(&mut self) -> ParseResult<Stmt> {
        let line = self.expect(QuokkaTokenKind::Do)?.line();
        let body = self.parse_block()?;
        self.expect(QuokkaTokenKind::While)?;
        let condition = self.parse_condition()?;
        self.match_token(QuokkaTokenKind::Semicolon);
        Ok(StmtNode::new(
            StmtKind::DoWhile(DoWhileStmt { condition, body }),
            line,
        ))
    }

    /// `for (init; cond; iter) { ... }`
    fn parse_for_loop(&mut self) -> ParseResult<Stmt> {
        let line = self.expect(QuokkaTokenKind::For)?.line();
        self.expect(QuokkaTokenKind::LeftParenthesis)?;
        let init = self.parse_simple_statement()?;
        self.expect(QuokkaTokenKind::Semicolon)?;
        let condition = self.parse_expression()?;
        self.expect(QuokkaTokenKind::Semicolon)?;
        let iter = self.parse_simple_statement()?;
        self.expect(QuokkaTokenKind::RightParenthesis)?;
        let body = self.parse_block()?;
        Ok(StmtNode::new(
            StmtKind::For(ForStmt {
                init,
                condition,
                iter,
                body,
            }),
            line,
        ))
    }

    /// 解析模块路径（如 System.Text）
    fn parse_dotted_path(&mut self) -> ParseResult<String> {
        let mut path = self.expect_identifier()?;
        while self.match_token(QuokkaTokenKind::Dot) {
            let part = self.expect_identifier()?;
            path.push('.');
            path.push_str(&part);
        }
        Ok(path)
    }

    fn parse_import_statement(&mut self) -> ParseResult<Stmt> {
        let line = self.expect(QuokkaTokenKind::Import)?.line();
        let path = self.parse_dotted_path()?;
        self.expect(QuokkaTokenKind::Semicolon)?;
        Ok(StmtNode::new(StmtKind::Import(ImportStmt { path }), line))
    }

    /// 类型名：`Name`、`A.B`，后接任意个 `[]` 与 `<T, ...>`
    pub(super) fn parse_type_name(&mut self) -> ParseResult<TypeName> {
        self.nested(|p| {
            let name = p.parse_dotted_path()?;
            let mut type_name = TypeName::named(name);
            loop {
                if p.match_token(QuokkaTokenKind::LeftSquareBracket) {
                    p.expect(QuokkaTokenKind::RightSquareBracket)?;
                    type_name = TypeName::array_of(type_name);
                } else if p.check(QuokkaTokenKind::LessThan) {
                    let args = p.parse_type_args()?;
                    type_name = match type_name {
                        TypeName::Named { name, args: existing } if existing.is_empty() => {
                            TypeName::Named { name, args }
                        }
                        _ => return Err(p.unexpected("'[' or end of type")),
                    };
                } else {
                    break;
                }
            }
            Ok(type_name)
        })
    }

    /// `<T, U>`
    pub(super) fn parse_type_args(&mut self) -> ParseResult<Vec<TypeName>> {
        self.expect(QuokkaTokenKind::LessThan)?;
        let mut args = vec![self.parse_type_name()?];
        while self.match_token(QuokkaTokenKind::Comma) {
            args.push(self.parse_type_name()?);
        }
        self.expect(QuokkaTokenKind::GreaterThan)?;
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::lexer::tokenize;

    fn parse_code(code: &str) -> (Module, Vec<ParserError>) {
        let (tokens, errors) = tokenize(code);
        assert!(errors.is_empty(), "lexer errors: {errors:?}");
        Parser::new(&tokens).parse()
    }

    fn parse_ok(code: &str) -> Module {
        let (module, errors) = parse_code(code);
        assert!(errors.is_empty(), "parse errors: {errors:?}");
        module
    }

    fn function_body(module: &Module) -> &[Stmt] {
        match &module.statements[0].kind {
            StmtKind::Function(func) => match &func.body.kind {
                StmtKind::Block(block) => &block.statements,
                other => panic!("expected block, got {other}"),
            },
            other => panic!("expected function, got {other}"),
        }
    }

    #[test]
    fn test_parse_function_signature() {
        let module = parse_ok("func add<T>(a: T, b: int): List<T>[] { }");
        let StmtKind::Function(func) = &module.statements[0].kind else {
            panic!("expected function");
        };
        assert_eq!(func.name, "add");
        assert_eq!(func.generics, vec!["T".to_string()]);
        assert_eq!(func.args.len(), 2);
        assert_eq!(func.return_type.to_string(), "List<T>[]");
    }

    #[test]
    fn test_default_return_type_is_void() {
        let module = parse_ok("func main() { }");
        assert_eq!(module.statements[0].to_string(), "func main(): void");
    }

    #[test]
    fn test_let_with_initializer_is_compound() {
        let module = parse_ok("func main() { let x: int = 1 + 2; }");
        let body = function_body(&module);
        let StmtKind::Compound(compound) = &body[0].kind else {
            panic!("expected compound");
        };
        assert!(matches!(compound.first.kind, StmtKind::VarDecl(_)));
        assert_eq!(compound.second.to_string(), "x = (1 + 2)");
    }

    #[test]
    fn test_assignment_targets() {
        let module = parse_ok("func main() { a = 1; s[0] = 'c'; Console.Title = \"t\"; }");
        let body = function_body(&module);
        assert!(body.iter().all(|s| matches!(s.kind, StmtKind::Assign(_))));

        let (_, errors) = parse_code("func main() { f() = 1; }");
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0].kind,
            ParserErrorKind::InvalidAssignmentTarget(_)
        ));
    }

    #[test]
    fn test_branch_collects_arms() {
        let module = parse_ok(
            "func main() { if (a) { } else if (b) { } else if (c) { } else { } }",
        );
        let body = function_body(&module);
        let StmtKind::Branch(branch) = &body[0].kind else {
            panic!("expected branch");
        };
        assert_eq!(branch.arms.len(), 3);
        assert!(branch.else_body.is_some());
    }

    #[test]
    fn test_loops() {
        let module = parse_ok(
            "func main() {
                while (i < 10) { i = i + 1; }
                do { break; } while (true);
                do { continue; } while (false)
                for (let i: int = 0; i < 3; i = i + 1) { }
            }",
        );
        let body = function_body(&module);
        assert!(matches!(body[0].kind, StmtKind::While(_)));
        assert!(matches!(body[1].kind, StmtKind::DoWhile(_)));
        assert!(matches!(body[2].kind, StmtKind::DoWhile(_)));
        let StmtKind::For(for_stmt) = &body[3].kind else {
            panic!("expected for");
        };
        assert!(matches!(for_stmt.init.kind, StmtKind::Compound(_)));
        assert!(matches!(for_stmt.iter.kind, StmtKind::Assign(_)));
    }

    #[test]
    fn test_import_and_lines() {
        let module = parse_ok("import System.Text;\n\nfunc main() { }");
        assert_eq!(module.statements[0].to_string(), "import System.Text");
        assert_eq!(module.statements[1].line, 3);
    }

    #[test]
    fn test_duplicate_argument_and_generic() {
        let (_, errors) = parse_code("func f(a: int, a: int) { }");
        assert_eq!(errors[0].kind, ParserErrorKind::DuplicateArgument("a".into()));

        let (_, errors) = parse_code("func g<T, T>() { }");
        assert_eq!(
            errors[0].kind,
            ParserErrorKind::DuplicateGenericParameter("T".into())
        );
    }

    #[test]
    fn test_semicolons_required() {
        let (_, errors) = parse_code("func main() { break }");
        assert_eq!(errors.len(), 1);
        let (_, errors) = parse_code("func main() { return 1 }");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_recovery_collects_multiple_errors() {
        let (module, errors) = parse_code(
            "func main() {
                let x: int = ;
                let y: int = 2;
                x = (1 + ;
                y = 3;
            }
            func other() { }",
        );
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].line(), Some(2));
        assert_eq!(errors[1].line(), Some(4));
        assert_eq!(module.statements.len(), 2);
        assert_eq!(function_body(&module).len(), 2);
    }

    #[test]
    fn test_recovery_makes_progress_on_stray_tokens() {
        let (module, errors) = parse_code("} ) func main() { }");
        assert_eq!(errors.len(), 2);
        assert_eq!(module.statements.len(), 1);
    }

    #[test]
    fn test_nesting_limit() {
        let code = format!("func main() {{ x = {}1{}; }}", "(".repeat(50), ")".repeat(50));
        let (tokens, _) = tokenize(&code);
        let limits = LimitConfig {
            max_nesting_depth: 16,
            ..LimitConfig::default()
        };
        let (_, errors) = Parser::with_limits(&tokens, &limits).parse();
        assert!(errors
            .iter()
            .any(|e| matches!(e.kind, ParserErrorKind::NestingTooDeep(16))));
    }

    #[test]
    fn test_long_operator_chain_counts_toward_nesting() {
        let limits = LimitConfig {
            max_nesting_depth: 32,
            ..LimitConfig::default()
        };
        let chain = |n: usize| vec!["1"; n].join(" + ");

        let code = format!("func main() {{ let x: int = {}; }}", chain(20));
        let (tokens, _) = tokenize(&code);
        let (_, errors) = Parser::with_limits(&tokens, &limits).parse();
        assert!(errors.is_empty(), "{errors:?}");

        for code in [
            format!("func main() {{ let x: int = {}; }}", chain(2000)),
            format!("func main() {{ x = a{}; }}", ".b".repeat(2000)),
            format!("func main() {{ x = a{}; }}", "[0]".repeat(2000)),
        ] {
            let (tokens, _) = tokenize(&code);
            let (_, errors) = Parser::with_limits(&tokens, &limits).parse();
            assert!(
                errors
                    .iter()
                    .any(|e| matches!(e.kind, ParserErrorKind::NestingTooDeep(32))),
                "{errors:?}"
            );
        }
    }

    #[test]
    fn test_missing_brace_at_eof() {
        let (_, errors) = parse_code("func main() { let x: int;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParserErrorKind::UnexpectedEndOfInput);
    }
}
