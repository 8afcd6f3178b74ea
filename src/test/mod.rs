//! Shared fixtures for unit tests.
//!
//! [`shapes`] defines a small class hierarchy in a fresh `app` loader:
//!
//! ```text
//! com.example.Shape            area()Ljava/lang/Number;       side * side
//!                              static scale(Shape, int)Shape
//!                              native perimeter()I            (no code)
//! com.example.Square extends Shape
//! com.example.ShapeHooks       static replacement candidates, see `HOOKS`
//! ```

use crate::runtime::{
    ClassBuilder, ClassLoader, ClassLoaderRc, MethodRc, Object, ObjectRc, RuntimeTypeRc, Value,
};
use crate::{Error, Result};

/// Static methods declared on `com.example.ShapeHooks` (name, descriptor, result)
const HOOKS: &[(&str, &str, i32)] = &[
    ("fakeArea", "(Lcom/example/Shape;)Ljava/lang/Integer;", 42),
    ("fakeArea", "(Lcom/example/Shape;I)Ljava/lang/Integer;", 42),
    ("origArea", "(Lcom/example/Shape;)Ljava/lang/Number;", 0),
    ("widenedArea", "(Lcom/example/Shape;)Ljava/lang/Object;", 0),
    ("squareArea", "(Lcom/example/Square;)Ljava/lang/Integer;", 0),
    ("anyArea", "(Ljava/lang/Object;)Ljava/lang/Integer;", 0),
    ("scaleLong", "(Lcom/example/Shape;J)Lcom/example/Shape;", 0),
    ("fakePerimeter", "(Lcom/example/Shape;)I", 0),
];

pub struct ShapesFixture {
    pub loader: ClassLoaderRc,
    pub shape: RuntimeTypeRc,
    pub square: RuntimeTypeRc,
    pub hooks: RuntimeTypeRc,
}

impl ShapesFixture {
    /// `com.example.Shape.area()Ljava/lang/Number;`
    pub fn area(&self) -> MethodRc {
        self.shape
            .declared_method("area", "()Ljava/lang/Number;")
            .unwrap()
    }

    /// A method declared on `com.example.ShapeHooks`
    pub fn hook_method(&self, name: &str, descriptor: &str) -> MethodRc {
        self.hooks.declared_method(name, descriptor).unwrap()
    }

    pub fn new_shape(&self, side: i32) -> ObjectRc {
        let shape = Object::new(&self.shape).unwrap();
        shape.set("side", side);
        shape
    }
}

fn side_of(receiver: &Value) -> Result<i32> {
    receiver
        .as_object()
        .and_then(|this| this.get("side").as_int())
        .ok_or_else(|| Error::TypeError(format!("not a shape: {receiver}")))
}

pub fn shapes() -> ShapesFixture {
    let boot = ClassLoader::bootstrap().unwrap();
    let loader = ClassLoader::new("app", boot);

    let shape = ClassBuilder::new("com.example.Shape")
        .public()
        .field("side", "I")
        .method(|m| {
            m.name("area")
                .descriptor("()Ljava/lang/Number;")
                .public()
                .code(|args| {
                    let side = side_of(&args[0])?;
                    Ok(Value::Int(side * side))
                })
        })
        .method(|m| {
            m.name("scale")
                .descriptor("(Lcom/example/Shape;I)Lcom/example/Shape;")
                .public()
                .static_()
                .code(|args| Ok(args[0].clone()))
        })
        .method(|m| m.name("perimeter").descriptor("()I").public().native())
        .build(&loader)
        .unwrap();

    let square = ClassBuilder::new("com.example.Square")
        .public()
        .extends("com.example.Shape")
        .build(&loader)
        .unwrap();

    let mut hooks = ClassBuilder::new("com.example.ShapeHooks").public();
    for (name, descriptor, result) in HOOKS {
        let result = *result;
        hooks = hooks.method(|m| {
            m.name(name)
                .descriptor(descriptor)
                .public()
                .static_()
                .code(move |_| Ok(Value::Int(result)))
        });
    }
    let hooks = hooks
        .method(|m| {
            m.name("instanceArea")
                .descriptor("(Lcom/example/Shape;)Ljava/lang/Integer;")
                .public()
                .code(|_| Ok(Value::Int(0)))
        })
        .build(&loader)
        .unwrap();

    ShapesFixture {
        loader,
        shape,
        square,
        hooks,
    }
}
