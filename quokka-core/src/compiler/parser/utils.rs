use super::super::lexer::token_kind::QuokkaTokenKind;
use super::expr::BinaryOp;

/// token 对应的二元运算符（`>>` 由两个 `>` 组成，单独处理）
pub fn binary_op(kind: QuokkaTokenKind) -> Option<BinaryOp> {
    let op = match kind {
        QuokkaTokenKind::DoublePipe => BinaryOp::LogicalOr,
        QuokkaTokenKind::DoubleAmpersand => BinaryOp::LogicalAnd,
        QuokkaTokenKind::Pipe => BinaryOp::BitOr,
        QuokkaTokenKind::Caret => BinaryOp::BitXor,
        QuokkaTokenKind::Ampersand => BinaryOp::BitAnd,
        QuokkaTokenKind::DoubleEqual => BinaryOp::Equal,
        QuokkaTokenKind::ExclamationEqual => BinaryOp::NotEqual,
        QuokkaTokenKind::LessThan => BinaryOp::Less,
        QuokkaTokenKind::LessThanEqual => BinaryOp::LessEqual,
        QuokkaTokenKind::GreaterThan => BinaryOp::Greater,
        QuokkaTokenKind::GreaterThanEqual => BinaryOp::GreaterEqual,
        QuokkaTokenKind::DoubleLessThan => BinaryOp::ShiftLeft,
        QuokkaTokenKind::Plus => BinaryOp::Add,
        QuokkaTokenKind::Minus => BinaryOp::Sub,
        QuokkaTokenKind::Asterisk => BinaryOp::Mul,
        QuokkaTokenKind::Slash => BinaryOp::Div,
        QuokkaTokenKind::Percent => BinaryOp::Rem,
        _ => return None,
    };
    Some(op)
}

/// 运算符优先级，数值越大结合越紧；全部左结合
pub fn get_precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::LogicalOr => 1,
        BinaryOp::LogicalAnd => 2,
        BinaryOp::BitOr => 3,
        BinaryOp::BitXor => 4,
        BinaryOp::BitAnd => 5,
        BinaryOp::Equal | BinaryOp::NotEqual => 6,
        BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => 7,
        BinaryOp::ShiftLeft | BinaryOp::ShiftRight => 8,
        BinaryOp::Add | BinaryOp::Sub => 9,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ladder() {
        let ladder = [
            BinaryOp::LogicalOr,
            BinaryOp::LogicalAnd,
            BinaryOp::BitOr,
            BinaryOp::BitXor,
            BinaryOp::BitAnd,
            BinaryOp::Equal,
            BinaryOp::Less,
            BinaryOp::ShiftLeft,
            BinaryOp::Add,
            BinaryOp::Mul,
        ];
        for pair in ladder.windows(2) {
            assert!(get_precedence(pair[0]) < get_precedence(pair[1]));
        }
    }

    #[test]
    fn test_binary_op_mapping() {
        assert_eq!(binary_op(QuokkaTokenKind::Percent), Some(BinaryOp::Rem));
        assert_eq!(binary_op(QuokkaTokenKind::Equal), None);
    }
}
