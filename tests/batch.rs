//! Integration tests for applying descriptor batches from a patch class loader.

use methodhook::{prelude::*, Result};

const AREA: &str = "()Ljava/lang/Number;";

fn init_logging() {
    let _ = pretty_env_logger::try_init();
}

/// An `origin` loader with `com.example.Shape` (concrete) and `com.example.Figure`
/// (abstract, with a concrete `area`), plus an empty `patch` loader delegating to it
fn loaders() -> Result<(ClassLoaderRc, ClassLoaderRc)> {
    init_logging();
    let origin = ClassLoader::new("origin", ClassLoader::bootstrap()?);

    for (name, abstract_) in [("com.example.Shape", false), ("com.example.Figure", true)] {
        let mut class = ClassBuilder::new(name).public().field("side", "I");
        if abstract_ {
            class = class.abstract_();
        }
        class
            .method(|m| {
                m.name("area").descriptor(AREA).public().code(|args| {
                    let side = args[0]
                        .as_object()
                        .and_then(|this| this.get("side").as_int())
                        .unwrap_or(0);
                    Ok(Value::Int(side * side))
                })
            })
            .build(&origin)?;
    }

    let patch = ClassLoader::new("patch", origin.clone());
    Ok((origin, patch))
}

fn hook_info(patch: &ClassLoader, class: &str, items: &[&str]) -> Result<()> {
    let names: Vec<Value> = items.iter().map(|item| Value::from(*item)).collect();
    ClassBuilder::new(class)
        .public()
        .static_field("hookItemNames", "[Ljava/lang/String;", Value::from(names))
        .build(patch)?;
    Ok(())
}

/// A descriptor unit hooking `<target>.area()` with a static `hook` returning `result`
fn unit(
    patch: &ClassLoader,
    name: &str,
    target: &str,
    hook_descriptor: &str,
    result: i32,
) -> Result<()> {
    ClassBuilder::new(name)
        .public()
        .static_field("className", "Ljava/lang/String;", Value::from(target))
        .static_field("methodName", "Ljava/lang/String;", Value::from("area"))
        .static_field("methodSig", "Ljava/lang/String;", Value::from(AREA))
        .method(|m| {
            m.name("hook")
                .descriptor(hook_descriptor)
                .public()
                .static_()
                .code(move |_| Ok(Value::Int(result)))
        })
        .build(patch)?;
    Ok(())
}

fn area_of(origin: &ClassLoader, class: &str, side: i32) -> Result<Value> {
    let class = origin.load_class(class)?;
    // Abstract classes cannot be instantiated; call the declared method directly instead
    if class.is_abstract() {
        let shape = Object::new(&origin.load_class("com.example.Shape")?)?;
        shape.set("side", side);
        return class
            .declared_method("area", AREA)
            .ok_or_else(|| Error::NotFound {
                class: class.name.clone(),
                name: "area".to_string(),
                signature: AREA.to_string(),
            })?
            .invoke(&[Value::from(shape)]);
    }
    let shape = Object::new(&class)?;
    shape.set("side", side);
    shape.invoke_virtual("area", AREA, &[])
}

#[test]
fn test_batch_isolates_malformed_descriptor() -> Result<()> {
    let (origin, patch) = loaders()?;
    hook_info(
        &patch,
        "com.methodhook.HookInfo",
        &["com.patch.First", "com.patch.Broken", "com.patch.Third"],
    )?;
    unit(&patch, "com.patch.First", "com.example.Shape", "(Lcom/example/Shape;)Ljava/lang/Integer;", 1)?;
    // Widened return type
    unit(&patch, "com.patch.Broken", "com.example.Shape", "(Lcom/example/Shape;)Ljava/lang/Object;", 2)?;
    unit(&patch, "com.patch.Third", "com.example.Figure", "(Lcom/example/Figure;)Ljava/lang/Integer;", 3)?;

    let installer = HookInstaller::new(InProcessHooker::new());
    let registry = HookRegistry::new();
    let report = DescriptorLoader::with_registry(&installer, &registry).apply(&patch, &origin)?;

    assert_eq!(report.installed(), 2);
    assert_eq!(report.failed(), 1);
    let broken = report.outcome("com.patch.Broken").unwrap();
    assert_eq!(broken.state, DescriptorState::Failed);
    assert_eq!(
        broken.error.as_ref().map(ToString::to_string).as_deref(),
        Some("Incompatible return types. Original: class java.lang.Number, Hook: class java.lang.Object")
    );

    assert_eq!(area_of(&origin, "com.example.Shape", 3)?, Value::Int(1));
    // Hooking a method of an abstract class only warns
    assert_eq!(area_of(&origin, "com.example.Figure", 3)?, Value::Int(3));
    assert_eq!(
        registry.sources(),
        vec![HookSource::new(&patch, "com.methodhook.HookInfo")]
    );
    Ok(())
}

#[test]
fn test_batch_with_backup() -> Result<()> {
    let (origin, patch) = loaders()?;
    hook_info(&patch, "com.methodhook.HookInfo", &["com.patch.AreaHook"])?;
    ClassBuilder::new("com.patch.AreaHook")
        .static_field("className", "Ljava/lang/String;", Value::from("com.example.Shape"))
        .static_field("methodName", "Ljava/lang/String;", Value::from("area"))
        .static_field("methodSig", "Ljava/lang/String;", Value::from(AREA))
        .method(|m| {
            m.name("hook")
                .descriptor("(Lcom/example/Shape;)Ljava/lang/Integer;")
                .static_()
                .code(|_| Ok(Value::Int(0)))
        })
        .method(|m| {
            m.name("backup")
                .descriptor("(Lcom/example/Shape;)Ljava/lang/Number;")
                .static_()
                .code(|_| Ok(Value::Null))
        })
        .build(&patch)?;

    let installer = HookInstaller::new(InProcessHooker::new());
    let registry = HookRegistry::new();
    let report = DescriptorLoader::with_registry(&installer, &registry).apply(&patch, &origin)?;
    assert!(report.is_success());

    let shape = Object::new(&origin.load_class("com.example.Shape")?)?;
    shape.set("side", 6);
    let backup = patch
        .load_class("com.patch.AreaHook")?
        .declared_method("backup", "(Lcom/example/Shape;)Ljava/lang/Number;")
        .unwrap();

    assert_eq!(shape.invoke_virtual("area", AREA, &[])?, Value::Int(0));
    assert_eq!(backup.invoke(&[Value::from(shape)])?, Value::Int(36));
    Ok(())
}

#[test]
fn test_skipped_and_missing_hook() -> Result<()> {
    let (origin, patch) = loaders()?;
    hook_info(
        &patch,
        "com.methodhook.HookInfo",
        &["com.patch.NoTarget", "com.patch.NoHook"],
    )?;
    ClassBuilder::new("com.patch.NoTarget")
        .static_field("className", "Ljava/lang/String;", Value::Null)
        .build(&patch)?;
    ClassBuilder::new("com.patch.NoHook")
        .static_field("className", "Ljava/lang/String;", Value::from("com.example.Shape"))
        .static_field("methodName", "Ljava/lang/String;", Value::from("area"))
        .static_field("methodSig", "Ljava/lang/String;", Value::from(AREA))
        // Not static, so it does not count as the hook
        .method(|m| {
            m.name("hook")
                .descriptor("(Lcom/example/Shape;)Ljava/lang/Integer;")
                .code(|_| Ok(Value::Int(0)))
        })
        .build(&patch)?;

    let installer = HookInstaller::new(InProcessHooker::new());
    let registry = HookRegistry::new();
    let report = DescriptorLoader::with_registry(&installer, &registry).apply(&patch, &origin)?;

    assert_eq!(report.skipped(), 1);
    assert_eq!(
        report.outcome("com.patch.NoHook").unwrap().error.as_ref().map(ToString::to_string),
        Some("Cannot find hook for area".to_string())
    );
    assert_eq!(installer.native().backup_and_hook_calls(), 0);
    assert_eq!(area_of(&origin, "com.example.Shape", 2)?, Value::Int(4));
    Ok(())
}

#[test]
fn test_custom_contract_names() -> Result<()> {
    let (origin, patch) = loaders()?;
    let names = vec![Value::from("org.patch.Item")];
    ClassBuilder::new("org.patch.Index")
        .static_field("items", "[Ljava/lang/String;", Value::from(names))
        .build(&patch)?;
    ClassBuilder::new("org.patch.Item")
        .static_field("target", "Ljava/lang/String;", Value::from("com.example.Shape"))
        .static_field("method", "Ljava/lang/String;", Value::from("area"))
        .static_field("descriptor", "Ljava/lang/String;", Value::from(AREA))
        .method(|m| {
            m.name("replace")
                .descriptor("(Lcom/example/Shape;)Ljava/lang/Integer;")
                .static_()
                .code(|_| Ok(Value::Int(11)))
        })
        .build(&patch)?;

    let config = HookConfig::default()
        .with_hook_info_class("org.patch.Index")
        .with_item_list_field("items")
        .with_target_fields("target", "method", "descriptor")
        .with_method_names("replace", "original")
        .with_runtime_version(30);
    let installer = HookInstaller::with_config(InProcessHooker::new(), config);
    let registry = HookRegistry::new();

    let report = DescriptorLoader::with_registry(&installer, &registry).apply(&patch, &origin)?;
    assert_eq!(report.installed(), 1);
    assert_eq!(installer.native().runtime_version(), 30);
    assert_eq!(area_of(&origin, "com.example.Shape", 2)?, Value::Int(11));
    Ok(())
}

#[test]
fn test_missing_item_list() -> Result<()> {
    let (origin, patch) = loaders()?;
    ClassBuilder::new("com.methodhook.HookInfo").build(&patch)?;

    let installer = HookInstaller::new(InProcessHooker::new());
    let result = DescriptorLoader::with_registry(&installer, &HookRegistry::new()).apply(&patch, &origin);
    assert!(matches!(
        result,
        Err(Error::MissingField { field, .. }) if field == "hookItemNames"
    ));
    Ok(())
}

#[test]
fn test_global_registry_and_reject_policy() -> Result<()> {
    let (origin, patch) = loaders()?;
    hook_info(&patch, "com.methodhook.GlobalInfo", &["com.patch.Once"])?;
    unit(&patch, "com.patch.Once", "com.example.Shape", "(Lcom/example/Shape;)Ljava/lang/Integer;", 5)?;

    let config = HookConfig::strict().with_hook_info_class("com.methodhook.GlobalInfo");
    let installer = HookInstaller::with_config(InProcessHooker::new(), config);
    let loader = DescriptorLoader::new(&installer);

    assert_eq!(loader.apply(&patch, &origin)?.installed(), 1);
    assert!(HookRegistry::global().contains(&HookSource::new(&patch, "com.methodhook.GlobalInfo")));
    assert!(matches!(
        loader.apply(&patch, &origin),
        Err(Error::AlreadyApplied(_))
    ));
    assert_eq!(installer.native().backup_and_hook_calls(), 1);
    Ok(())
}

#[test]
fn test_batch_continues_past_unknown_method() -> Result<()> {
    let (origin, patch) = loaders()?;
    hook_info(
        &patch,
        "com.methodhook.HookInfo",
        &["com.patch.Volume", "com.patch.Area"],
    )?;
    ClassBuilder::new("com.patch.Volume")
        .static_field("className", "Ljava/lang/String;", Value::from("com.example.Shape"))
        .static_field("methodName", "Ljava/lang/String;", Value::from("volume"))
        .static_field("methodSig", "Ljava/lang/String;", Value::from(AREA))
        .method(|m| {
            m.name("hook")
                .descriptor("(Lcom/example/Shape;)Ljava/lang/Integer;")
                .static_()
                .code(|_| Ok(Value::Int(0)))
        })
        .build(&patch)?;
    unit(&patch, "com.patch.Area", "com.example.Shape", "(Lcom/example/Shape;)Ljava/lang/Integer;", 8)?;

    let installer = HookInstaller::new(InProcessHooker::new());
    let registry = HookRegistry::new();
    let report = DescriptorLoader::with_registry(&installer, &registry).apply(&patch, &origin)?;

    assert_eq!(
        report.outcome("com.patch.Volume").unwrap().error.as_ref().map(ToString::to_string),
        Some("Method not found: com.example.Shape.volume()Ljava/lang/Number;".to_string())
    );
    assert_eq!(report.outcome("com.patch.Area").unwrap().state, DescriptorState::Installed);
    assert_eq!(area_of(&origin, "com.example.Shape", 2)?, Value::Int(8));
    Ok(())
}
