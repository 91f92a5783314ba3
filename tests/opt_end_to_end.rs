use pyrite_opt::ir::def::{
    BasicBlock, BinOp, Expr, ExprKind, Program, Stmt, Value, ValueKind,
};
use pyrite_opt::ir::opt::Optimizer;
use pyrite_opt::utils::Span;

fn num(n: i128) -> Value<Span> {
    Value::new(ValueKind::Num(n), Span::dummy())
}

fn none() -> Value<Span> {
    Value::new(ValueKind::None, Span::dummy())
}

fn id(name: &str) -> Value<Span> {
    Value::new(ValueKind::Id(name.to_string()), Span::dummy())
}

fn value_expr(value: Value<Span>) -> Expr<Span> {
    Expr::new(ExprKind::Value(value), Span::dummy())
}

fn binary(op: BinOp, lhs: Value<Span>, rhs: Value<Span>) -> Expr<Span> {
    Expr::new(ExprKind::Binary { op, lhs, rhs }, Span::dummy())
}

fn assign(dst: &str, src: Expr<Span>) -> Stmt<Span> {
    Stmt::Assign {
        dst: dst.to_string(),
        src,
    }
}

fn ret(value: Value<Span>) -> Stmt<Span> {
    Stmt::Return { value }
}

fn block(label: &str, stmts: Vec<Stmt<Span>>) -> BasicBlock<Span> {
    BasicBlock {
        label: label.to_string(),
        stmts,
    }
}

fn program(body: Vec<BasicBlock<Span>>) -> Program<Span> {
    Program {
        body,
        ..Program::default()
    }
}

fn run(p: &Program<Span>) -> Program<Span> {
    Optimizer::new().run(p).expect("well-formed program")
}

fn assigned_expr<'a>(block: &'a BasicBlock<Span>, dst: &str) -> &'a Expr<Span> {
    block
        .stmts
        .iter()
        .find_map(|s| match s {
            Stmt::Assign { dst: d, src } if d == dst => Some(src),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no assignment to {} survived", dst))
}

#[test]
fn pure_fold_then_removal_of_dead_target() {
    // x is never read, so the folded assignment disappears entirely.
    let p = program(vec![block(
        "entry",
        vec![
            assign("x", binary(BinOp::Add, num(2), num(3))),
            ret(num(0)),
        ],
    )]);
    let out = run(&p);
    assert_eq!(out.body[0].stmts, vec![ret(num(0))]);
}

#[test]
fn pure_fold_keeps_a_returned_target() {
    let p = program(vec![block(
        "entry",
        vec![
            assign("x", binary(BinOp::Add, num(2), num(3))),
            ret(id("x")),
        ],
    )]);
    let out = run(&p);
    assert_eq!(
        assigned_expr(&out.body[0], "x").kind,
        ExprKind::Value(num(5))
    );
}

#[test]
fn neededness_through_branch_keeps_the_assignment() {
    let p = program(vec![
        block(
            "entry",
            vec![
                assign("y", value_expr(num(7))),
                Stmt::If {
                    cond: id("c"),
                    then_lbl: "then".to_string(),
                    else_lbl: "else".to_string(),
                },
            ],
        ),
        block("then", vec![ret(id("y"))]),
        block("else", vec![ret(num(0))]),
    ]);
    let out = run(&p);
    assert_eq!(out.body[0].stmts.len(), 2);
    assert!(matches!(&out.body[0].stmts[0], Stmt::Assign { dst, .. } if dst == "y"));
}

#[test]
fn neededness_through_branch_drops_when_both_arms_ignore_it() {
    let p = program(vec![
        block(
            "entry",
            vec![
                assign("y", value_expr(num(7))),
                Stmt::If {
                    cond: id("c"),
                    then_lbl: "then".to_string(),
                    else_lbl: "else".to_string(),
                },
            ],
        ),
        block("then", vec![ret(num(1))]),
        block("else", vec![ret(num(0))]),
    ]);
    let out = run(&p);
    assert_eq!(out.body[0].stmts.len(), 1);
    assert!(matches!(&out.body[0].stmts[0], Stmt::If { .. }));
}

#[test]
fn possibly_trapping_division_survives_a_dead_target() {
    let p = program(vec![block(
        "entry",
        vec![
            assign("z", binary(BinOp::IDiv, id("a"), id("b"))),
            ret(num(0)),
        ],
    )]);
    let out = run(&p);
    assert_eq!(out.body[0].stmts.len(), 2);
    assert!(matches!(&out.body[0].stmts[0], Stmt::Assign { dst, .. } if dst == "z"));
}

#[test]
fn effectful_call_statement_is_untouched() {
    let p = program(vec![block(
        "entry",
        vec![
            Stmt::Eval {
                expr: Expr::new(
                    ExprKind::Call {
                        callee: "print".to_string(),
                        args: vec![id("x")],
                    },
                    Span::dummy(),
                ),
            },
            ret(num(0)),
        ],
    )]);
    let out = run(&p);
    assert_eq!(out.body[0].stmts, p.body[0].stmts);
}

#[test]
fn chained_folding_does_not_propagate_constants() {
    let p = program(vec![block(
        "entry",
        vec![
            assign("a", binary(BinOp::Add, num(1), num(2))),
            assign("b", binary(BinOp::Mul, id("a"), num(3))),
            ret(id("b")),
        ],
    )]);
    let (out, stats) = Optimizer::new()
        .run_with_stats(&p)
        .expect("well-formed program");

    assert_eq!(
        assigned_expr(&out.body[0], "a").kind,
        ExprKind::Value(num(3))
    );
    // `a` is a variable read, not a literal, so `b` stays a product.
    assert_eq!(
        assigned_expr(&out.body[0], "b").kind,
        ExprKind::Binary {
            op: BinOp::Mul,
            lhs: id("a"),
            rhs: num(3),
        }
    );
    assert_eq!(stats.folded, 1);
    assert_eq!(stats.iterations, 2);
}

#[test]
fn none_equality_folds_and_dead_comparison_disappears() {
    let p = program(vec![block(
        "entry",
        vec![
            assign("e1", binary(BinOp::Eq, none(), none())),
            assign("e2", binary(BinOp::Ne, none(), num(0))),
            ret(id("e1")),
        ],
    )]);
    let out = run(&p);
    assert_eq!(
        assigned_expr(&out.body[0], "e1").kind,
        ExprKind::Value(Value::new(ValueKind::Bool(true), Span::dummy()))
    );
    // e2 folds to bool(false) and is then swept as unneeded.
    assert_eq!(out.body[0].stmts.len(), 2);
}

#[test]
fn function_and_method_bodies_are_optimized_independently() {
    let mut fun = pyrite_opt::ir::def::FunDef::new("helper");
    fun.body = vec![block(
        "f_entry",
        vec![
            assign("t", binary(BinOp::Add, num(10), num(20))),
            ret(num(0)),
        ],
    )];
    let method_body = vec![block(
        "m_entry",
        vec![
            assign("u", binary(BinOp::Mul, num(4), num(5))),
            ret(id("u")),
        ],
    )];
    let mut method = pyrite_opt::ir::def::FunDef::new("get");
    method.body = method_body;

    let p = Program {
        inits: Vec::new(),
        funs: vec![fun],
        classes: vec![pyrite_opt::ir::def::ClassDef {
            name: "Point".to_string(),
            methods: vec![method],
        }],
        body: vec![block("entry", vec![ret(num(0))])],
    };

    let out = run(&p);
    // Dead temp in the free function is gone; the method's folded value
    // survives because it is returned.
    assert_eq!(out.funs[0].body[0].stmts.len(), 1);
    assert_eq!(
        assigned_expr(&out.classes[0].methods[0].body[0], "u").kind,
        ExprKind::Value(num(20))
    );
}
