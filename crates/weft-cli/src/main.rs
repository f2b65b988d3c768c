use std::{env, process::ExitCode, time::Instant};

use weft::{
    ExecContext, Machine, NodeRegistry, ProgramBuilder, StderrTracer, StdPrint, Value,
    nodes::{self, CoreOp},
};

fn main() -> ExitCode {
    let trace = env::args().any(|arg| arg == "--trace");

    let mut registry = NodeRegistry::new();
    if let Err(err) = nodes::register_core_nodes(&mut registry) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    // the classic demo blueprint: print((2.0 + 3.0) * 4.0)
    let program = ProgramBuilder::new()
        .load_const(Value::Float(2.0))
        .load_const(Value::Float(3.0))
        .invoke(CoreOp::AddFloat)
        .load_const(Value::Float(4.0))
        .invoke(CoreOp::MulFloat)
        .invoke(CoreOp::PrintFloat)
        .build();

    let machine = Machine::new(&registry);
    let mut out = StdPrint;
    let mut ctx = ExecContext::new(0.016, (), &mut out);

    let start = Instant::now();
    let result = if trace {
        machine.execute_traced(&program, &mut ctx, &mut StderrTracer)
    } else {
        machine.execute(&program, &mut ctx)
    };
    let elapsed = start.elapsed();

    match result {
        Ok(stack) => {
            eprintln!("halted normally after {elapsed:?}, residual stack depth {}", stack.len());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("fault after {elapsed:?}: {err}");
            ExitCode::FAILURE
        }
    }
}
