use inkwell::context::Context;

use brainfuck_llvm::codegen::{pipeline, CodeGenerator, CodegenError};
use brainfuck_llvm::config::CompileOptions;
use brainfuck_llvm::driver::{CompileError, Driver};
use brainfuck_llvm::parser::parse;

const HELLO_WORLD: &str = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

/// Helper function to lower a source text with the given options and return its IR
fn generate_ir(source: &str, options: CompileOptions) -> Result<String, CodegenError> {
    let program = parse(source).expect("parse failed");
    let context = Context::create();
    let mut codegen = CodeGenerator::new(&context, "test", &options);
    codegen.generate(&program)?;
    Ok(codegen.print_to_string())
}

#[test]
fn test_runtime_declarations() {
    let ir = generate_ir("+", CompileOptions::default()).expect("codegen failed");

    assert!(ir.contains("@s = internal global [30000 x i8] zeroinitializer"), "{ir}");
    assert!(ir.contains("@sp = internal global i64 0"), "{ir}");
    assert!(ir.contains("declare i32 @getchar()"), "{ir}");
    assert!(ir.contains("declare i32 @putchar(i32)"), "{ir}");
    assert!(ir.contains("define void @main()"), "{ir}");
    assert!(ir.contains("ret void"), "{ir}");
}

#[test]
fn test_tape_configuration() {
    let options = CompileOptions::default().with_cell_size(16).with_storage_size(100);
    let ir = generate_ir("+", options).expect("codegen failed");
    assert!(ir.contains("@s = internal global [100 x i16] zeroinitializer"), "{ir}");
}

#[test]
fn test_merged_counts_become_single_instructions() {
    let ir = generate_ir("+++>>-<", CompileOptions::default()).expect("codegen failed");
    assert!(ir.contains("add i8 %cell.val, 3"), "{ir}");
    assert!(ir.contains("add i64 %sp, 2") || ir.contains("add i64 %sp1, 2"), "{ir}");
    assert!(ir.contains("sub i8"), "{ir}");
}

#[test]
fn test_counts_wrap_to_cell_width() {
    let source = "+".repeat(300);
    let ir = generate_ir(&source, CompileOptions::default()).expect("codegen failed");
    assert!(ir.contains("add i8 %cell.val, 44"), "{ir}");
}

#[test]
fn test_io_resizes_between_cell_and_host_char() {
    let ir = generate_ir(",.", CompileOptions::default()).expect("codegen failed");
    assert!(ir.contains("call i32 @getchar()"), "{ir}");
    assert!(ir.contains("trunc i32 %input to i8"), "{ir}");
    assert!(ir.contains("zext i8"), "{ir}");
    assert!(ir.contains("call i32 @putchar(i32"), "{ir}");

    let wide = generate_ir(",.", CompileOptions::default().with_cell_size(64)).expect("codegen failed");
    assert!(wide.contains("sext i32 %input to i64"), "{wide}");
    assert!(wide.contains("trunc i64"), "{wide}");

    let same = generate_ir(",.", CompileOptions::default().with_cell_size(32)).expect("codegen failed");
    assert!(!same.contains("trunc"), "{same}");
    assert!(!same.contains("ext i"), "{same}");
}

#[test]
fn test_loop_is_pre_tested() {
    let ir = generate_ir("[-]", CompileOptions::default()).expect("codegen failed");
    assert!(ir.contains("br label %loop.cond"), "{ir}");
    assert!(ir.contains("icmp ne i8"), "{ir}");
    assert!(ir.contains("br i1 %loop.test, label %loop.body, label %loop.end"), "{ir}");
}

#[test]
fn test_straight_line_program_has_no_loop_blocks() {
    let ir = generate_ir("+>+.", CompileOptions::default()).expect("codegen failed");
    assert!(!ir.contains("loop.cond"), "{ir}");
}

#[test]
fn test_invalid_cell_size() {
    let err = generate_ir("+", CompileOptions::default().with_cell_size(12)).unwrap_err();
    assert!(matches!(err, CodegenError::InvalidCellSize(12)), "{err}");
}

#[test]
fn test_invalid_storage_size() {
    let err = generate_ir("+", CompileOptions::default().with_storage_size(0)).unwrap_err();
    assert!(matches!(err, CodegenError::InvalidStorageSize(0)), "{err}");
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_storage_size_must_fit_llvm_array() {
    let too_big = u32::MAX as usize + 1;
    let err = generate_ir("+", CompileOptions::default().with_storage_size(too_big)).unwrap_err();
    assert!(matches!(err, CodegenError::InvalidStorageSize(n) if n == too_big), "{err}");
}

#[test]
fn test_generate_twice_is_rejected() {
    let program = parse("+").expect("parse failed");
    let context = Context::create();
    let mut codegen = CodeGenerator::new(&context, "twice", &CompileOptions::default());
    codegen.generate(&program).expect("first generation failed");
    assert!(matches!(codegen.generate(&program), Err(CodegenError::AlreadyGenerated)));
}

#[test]
fn test_module_verifies() {
    let program = parse(HELLO_WORLD).expect("parse failed");
    let context = Context::create();
    let mut codegen = CodeGenerator::new(&context, "hello", &CompileOptions::default());
    codegen.generate(&program).expect("codegen failed");
    assert!(codegen.module().verify().is_ok());
    assert!(codegen.module().get_function("main").is_some());
}

#[test]
fn test_emission_is_idempotent() {
    let driver = Driver::default();
    let first = driver.emit_ir(HELLO_WORLD, "hello").expect("emit failed");
    let second = driver.emit_ir(HELLO_WORLD, "hello").expect("emit failed");
    assert_eq!(first, second);
}

#[test]
fn test_emit_to_sink() {
    let mut sink = Vec::new();
    Driver::default()
        .emit("+.", "sink", &mut sink)
        .expect("emit failed");
    let ir = String::from_utf8(sink).expect("IR is not UTF-8");
    assert!(ir.contains("; ModuleID = 'sink'"), "{ir}");
    assert!(ir.contains("define void @main()"), "{ir}");
}

#[test]
fn test_optimized_module_keeps_entry_point() {
    for level in 1..=3 {
        let driver = Driver::new(CompileOptions::default().with_opt_level(level));
        let ir = driver.emit_ir(HELLO_WORLD, "hello").expect("optimized emit failed");
        assert!(ir.contains("define void @main()"), "O{level}: {ir}");
        assert!(ir.contains("@putchar"), "O{level}: {ir}");
    }
}

#[test]
fn test_pipeline_names() {
    assert_eq!(pipeline(1), "default<O1>");
    assert_eq!(pipeline(3), "default<O3>");
    assert_eq!(pipeline(9), "default<O3>");
}

#[test]
fn test_syntax_error_stops_emission() {
    let err = Driver::default().emit_ir("[", "broken").unwrap_err();
    assert!(matches!(err, CompileError::Syntax(_)));
    assert!(err.to_string().starts_with("syntax error"), "{err}");
}

#[test]
fn test_nested_loops_lower_and_verify() {
    let depth = 200;
    let source = format!("{}-{}", "[".repeat(depth), "]".repeat(depth));
    let ir = generate_ir(&source, CompileOptions::default()).expect("codegen failed");
    assert!(ir.contains(&format!("loop.cond{}", depth - 1)), "{ir}");
}
