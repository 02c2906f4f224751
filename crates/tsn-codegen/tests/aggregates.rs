//! Object literals and `new`.

mod common;

use std::rc::Rc;

use inkwell::context::Context;
use inkwell::types::StructType;
use inkwell::values::{FloatValue, PointerValue};
use inkwell::AddressSpace;
use tsn_codegen::{Callable, CodeGen, LowerErrorKind, Lowered, Scope, Symbol, SymbolKind};
use tsn_tree::{
    BinaryOp, ClassMember, DeclId, Declarations, Expr, ObjectLiteralElement, ObjectShape, SyntaxKind, Ty,
};

use common::*;

fn prop(name: &str, value: Expr) -> ObjectLiteralElement {
    ObjectLiteralElement::property(name, value)
}

fn load_field<'ctx>(
    cg: &CodeGen<'ctx>,
    layout: StructType<'ctx>,
    object: PointerValue<'ctx>,
    index: u32,
) -> FloatValue<'ctx> {
    let field = cg.builder().build_struct_gep(layout, object, index, "field").unwrap();
    cg.builder()
        .build_load(cg.context().f64_type(), field, "value")
        .unwrap()
        .into_float_value()
}

/// `fields[0] * 10 + fields[1]` of a freshly lowered two-number literal.
fn encode_two_fields(cg: &mut CodeGen<'_>, name: &str, literal: &Expr) {
    number_fn(cg, name);
    let object = cg.lower_value(literal).unwrap().into_pointer_value();
    let layout = cg.object_layout(&literal.ty).unwrap();
    let first = load_field(cg, layout, object, 0);
    let second = load_field(cg, layout, object, 1);
    let ten = cg.context().f64_type().const_float(10.0);
    let scaled = cg.builder().build_float_mul(first, ten, "scaled").unwrap();
    let sum = cg.builder().build_float_add(scaled, second, "sum").unwrap();
    ret(cg, Lowered::value(sum));
}

fn ab_shape() -> Ty {
    Ty::Object(ObjectShape::literal([("a", Ty::Number), ("b", Ty::Number)]))
}

#[test]
fn literal_properties_land_in_source_order() {
    let context = Context::create();
    let mut cg = codegen(&context, Declarations::new());
    define_allocator(&cg);

    let literal = Expr::object_literal(
        vec![prop("a", Expr::number(1.0)), prop("b", Expr::number(2.0))],
        ab_shape(),
    );
    encode_two_fields(&mut cg, "ab", &literal);

    assert_eq!(jit(cg).call_f64("ab"), 12.0);
}

/// Properties are matched to fields by position. A literal written in a
/// different order than its type's properties puts each value in the slot
/// of the same position, whatever its name.
#[test]
fn literal_fields_are_stored_by_position_not_name() {
    let context = Context::create();
    let mut cg = codegen(&context, Declarations::new());
    define_allocator(&cg);

    let literal = Expr::object_literal(
        vec![prop("b", Expr::number(2.0)), prop("a", Expr::number(1.0))],
        ab_shape(),
    );
    encode_two_fields(&mut cg, "ba", &literal);

    assert_eq!(jit(cg).call_f64("ba"), 21.0);
}

#[test]
fn literal_with_mixed_field_types() {
    let context = Context::create();
    let mut cg = codegen(&context, Declarations::new());
    define_allocator(&cg);

    let ty = Ty::Object(ObjectShape::literal([
        ("flag", Ty::Boolean),
        ("n", Ty::Number),
        ("s", Ty::String),
    ]));
    let literal = Expr::object_literal(
        vec![
            prop("flag", Expr::boolean(true)),
            prop("n", Expr::number(3.5)),
            prop("s", Expr::string("hi")),
        ],
        ty.clone(),
    );

    number_fn(&cg, "n");
    let object = cg.lower_value(&literal).unwrap().into_pointer_value();
    let layout = cg.object_layout(&ty).unwrap();
    assert_eq!(layout.count_fields(), 3);
    let n = load_field(&cg, layout, object, 1);
    ret(&mut cg, Lowered::value(n));

    assert_eq!(jit(cg).call_f64("n"), 3.5);
}

#[test]
fn non_property_elements_are_rejected_before_allocation() {
    let context = Context::create();
    let mut cg = codegen(&context, Declarations::new());
    let function = number_fn(&cg, "f");

    let cases = [
        (ObjectLiteralElement::Spread(Expr::ident("o", ab_shape())), SyntaxKind::SpreadAssignment),
        (ObjectLiteralElement::Shorthand { name: "a".into() }, SyntaxKind::ShorthandPropertyAssignment),
        (ObjectLiteralElement::Method { name: "m".into() }, SyntaxKind::MethodDeclaration),
    ];
    for (element, syntax) in cases {
        let literal = Expr::object_literal(vec![prop("a", Expr::number(1.0)), element], ab_shape());
        let err = cg.lower_expr(&literal).unwrap_err();
        assert_eq!(err.kind, LowerErrorKind::UnsupportedLiteralElement { syntax });
    }
    assert!(instructions(function).is_empty());
}

#[test]
fn literal_value_must_match_its_field_type() {
    let context = Context::create();
    let mut cg = codegen(&context, Declarations::new());
    number_fn(&cg, "f");

    let literal = Expr::object_literal(
        vec![prop("a", Expr::boolean(true)), prop("b", Expr::number(2.0))],
        ab_shape(),
    );
    let err = cg.lower_expr(&literal).unwrap_err();
    assert_eq!(
        err.kind,
        LowerErrorKind::UnsupportedOperand { op: ":", found: "boolean".into() }
    );
}

struct Classes {
    decls: Declarations,
    point: DeclId,
    counter: DeclId,
}

fn classes() -> Classes {
    let mut decls = Declarations::new();
    let point = decls.add_class("Point", |_| {
        vec![
            ClassMember::field("x", Ty::Number),
            ClassMember::field("y", Ty::Number),
            ClassMember::Constructor,
        ]
    });
    let counter = decls.add_class("Counter", |_| {
        vec![ClassMember::field("count", Ty::Number), ClassMember::Constructor]
    });
    Classes { decls, point, counter }
}

/// `Point_new(x, y)` allocates and returns a `Point`; `Counter_init(this,
/// start)` fills in storage it is handed. Returns the module scope.
fn define_constructors<'ctx>(
    cg: &mut CodeGen<'ctx>,
    point: DeclId,
    counter: DeclId,
    with_point_constructor: bool,
) -> Rc<Scope<'ctx>> {
    let context = cg.context();
    let f64_ty = context.f64_type();
    let ptr_ty = context.ptr_type(AddressSpace::default());

    let point_new = begin_fn(cg, "Point_new", ptr_ty.fn_type(&[f64_ty.into(), f64_ty.into()], false));
    let mut frame = Scope::new();
    for (param, name) in point_new.get_param_iter().zip(["x", "y"]) {
        param.set_name(name);
        frame.declare(name, Symbol::Value(Lowered::Value(param)));
    }
    cg.set_scope(Rc::new(frame));
    let literal = Expr::object_literal(
        vec![
            prop("x", Expr::ident("x", Ty::Number)),
            prop("y", Expr::ident("y", Ty::Number)),
        ],
        Ty::Class(point),
    );
    let object = cg.lower_expr(&literal).unwrap();
    ret(cg, object);

    let counter_init = begin_fn(
        cg,
        "Counter_init",
        context.void_type().fn_type(&[ptr_ty.into(), f64_ty.into()], false),
    );
    let mut frame = Scope::new();
    for (param, name) in counter_init.get_param_iter().zip(["this", "start"]) {
        param.set_name(name);
        frame.declare(name, Symbol::Value(Lowered::Value(param)));
    }
    cg.set_scope(Rc::new(frame));
    let store = Expr::binary(
        BinaryOp::Assign,
        Expr::property(Expr::this(Ty::Class(counter)), "count", Ty::Number),
        Expr::ident("start", Ty::Number),
        Ty::Number,
    );
    cg.lower_expr(&store).unwrap();
    cg.builder().build_return(None).unwrap();

    let mut point_scope = Scope::for_class(point);
    if with_point_constructor {
        point_scope.declare("constructor", Symbol::Function(Callable::from_function(point_new)));
    }
    let mut counter_scope = Scope::for_class(counter);
    counter_scope.declare("constructor", Symbol::Function(Callable::from_function(counter_init)));

    let mut scope = Scope::new();
    scope.declare("Point", Symbol::Scope(Rc::new(point_scope)));
    scope.declare("Counter", Symbol::Scope(Rc::new(counter_scope)));
    Rc::new(scope)
}

#[test]
fn new_calls_a_constructor_that_returns_the_instance() {
    let context = Context::create();
    let Classes { decls, point, counter } = classes();
    let mut cg = codegen(&context, decls);
    define_allocator(&cg);
    let module_scope = define_constructors(&mut cg, point, counter, true);

    number_fn(&cg, "main");
    cg.set_scope(Rc::clone(&module_scope));
    let new = Expr::new_instance(
        Expr::ident("Point", Ty::Void),
        vec![Expr::number(3.0), Expr::number(4.0)],
        Ty::Class(point),
    );
    let instance = cg.lower_value(&new).unwrap();

    let mut frame = Scope::child(module_scope);
    frame.declare("p", Symbol::Value(object_local(&cg, "p", instance)));
    cg.set_scope(Rc::new(frame));
    let p = || Expr::ident("p", Ty::Class(point));
    let sum = Expr::binary(
        BinaryOp::Sub,
        Expr::property(p(), "y", Ty::Number),
        Expr::property(p(), "x", Ty::Number),
        Ty::Number,
    );
    let value = cg.lower_expr(&sum).unwrap();
    ret(&mut cg, value);

    assert_eq!(jit(cg).call_f64("main"), 1.0);
}

#[test]
fn new_hands_fresh_storage_to_a_receiver_constructor() {
    let context = Context::create();
    let Classes { decls, point, counter } = classes();
    let mut cg = codegen(&context, decls);
    define_allocator(&cg);
    let module_scope = define_constructors(&mut cg, point, counter, true);

    number_fn(&cg, "main");
    cg.set_scope(Rc::clone(&module_scope));
    let new = Expr::new_instance(
        Expr::ident("Counter", Ty::Void),
        vec![Expr::number(5.0)],
        Ty::Class(counter),
    );
    let instance = cg.lower_value(&new).unwrap();
    assert!(instance.is_pointer_value());

    let mut frame = Scope::child(module_scope);
    frame.declare("c", Symbol::Value(object_local(&cg, "c", instance)));
    cg.set_scope(Rc::new(frame));
    let value = cg
        .lower_expr(&Expr::property(Expr::ident("c", Ty::Class(counter)), "count", Ty::Number))
        .unwrap();
    ret(&mut cg, value);

    assert_eq!(jit(cg).call_f64("main"), 5.0);
}

#[test]
fn new_without_a_constructor_is_unresolved() {
    let context = Context::create();
    let Classes { decls, point, counter } = classes();
    let mut cg = codegen(&context, decls);
    let module_scope = define_constructors(&mut cg, point, counter, false);

    number_fn(&cg, "main");
    cg.set_scope(module_scope);
    let new = Expr::new_instance(Expr::ident("Point", Ty::Void), vec![], Ty::Class(point));
    let err = cg.lower_expr(&new).unwrap_err();
    assert_eq!(
        err.kind,
        LowerErrorKind::UnresolvedSymbol { name: "Point".into(), kind: SymbolKind::Constructor }
    );
    insta::assert_snapshot!(err.to_string(), @"unresolved constructor of `Point`");

    let new = Expr::new_instance(Expr::ident("Nowhere", Ty::Void), vec![], Ty::Class(point));
    assert!(cg.lower_expr(&new).is_err());
}

#[test]
fn new_target_must_be_a_name() {
    let context = Context::create();
    let Classes { decls, point, .. } = classes();
    let mut cg = codegen(&context, decls);
    number_fn(&cg, "main");

    let target = Expr::property(Expr::ident("ns", Ty::Void), "Point", Ty::Void);
    let new = Expr::new_instance(target, vec![], Ty::Class(point));
    let err = cg.lower_expr(&new).unwrap_err();
    assert_eq!(
        err.kind,
        LowerErrorKind::UnsupportedExpressionShape {
            syntax: SyntaxKind::PropertyAccessExpression,
            position: "new target",
        }
    );
}
