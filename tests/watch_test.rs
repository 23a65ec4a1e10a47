mod common;
use common::*;
use sdb::mach::{Cpu, Runtime, State};

#[test]
fn test_batch_style_run() {
    let mut r = Runtime::default();
    r.enter("c");
    assert_eq!(exec(&mut r), "HIT GOOD TRAP at pc = 0x8000001c\n");
    r.enter("p *0x80001000");
    assert_eq!(exec(&mut r), "0x00000005  5\n");
}

#[test]
fn test_watch_register_expression() {
    let mut r = Runtime::default();
    r.enter("w $t0 == 3");
    assert_eq!(exec(&mut r), "Hardware watchpoint 0: $t0 == 3\n");
    r.enter("c");
    assert_eq!(
        exec(&mut r),
        "Hardware watchpoint 0: $t0 == 3\n\nOld value = 0x00000000\nNew value = 0x00000001\n"
    );
    r.enter("p $t0");
    assert_eq!(exec(&mut r), "0x00000003  3\n");
    r.enter("d 0");
    r.enter("c");
    assert_eq!(
        exec(&mut r),
        "Deleted watchpoint 0\nHIT GOOD TRAP at pc = 0x8000001c\n"
    );
}

#[test]
fn test_small_pool() {
    let mut r = Runtime::new(Cpu::builtin(), 1);
    r.enter("w $t0");
    r.enter("w $t1");
    assert_eq!(
        exec(&mut r),
        "Hardware watchpoint 0: $t0\n?no free watchpoint, all 1 are in use\n"
    );
    r.enter("d 0");
    r.enter("w $t1");
    assert_eq!(
        exec(&mut r),
        "Deleted watchpoint 0\nHardware watchpoint 0: $t1\n"
    );
}

#[test]
fn test_bad_trap_from_image() {
    // addi a0, zero, 3; ebreak
    let cpu = Cpu::with_image(&image(&[0x0030_0513, 0x0010_0073])).unwrap();
    let mut r = Runtime::new(cpu, 4);
    r.enter("c");
    assert_eq!(exec(&mut r), "HIT BAD TRAP at pc = 0x80000004\n");
    assert_eq!(r.state(), State::Ended { pc: 0x8000_0004, code: 3 });
}

#[test]
fn test_invalid_instruction_aborts() {
    let cpu = Cpu::with_image(&image(&[0x0000_0000])).unwrap();
    let mut r = Runtime::new(cpu, 4);
    r.enter("si");
    assert_eq!(
        exec(&mut r),
        "?invalid opcode 0x00000000 at pc = 0x80000000\n"
    );
    assert_eq!(r.state(), State::Aborted { pc: 0x8000_0000 });
    r.enter("c");
    assert_eq!(
        exec(&mut r),
        "?program execution has ended; restart the debugger to run it again\n"
    );
}

#[test]
fn test_runaway_program_is_interruptible() {
    // jal zero, 0
    let cpu = Cpu::with_image(&image(&[0x0000_006f])).unwrap();
    let mut r = Runtime::new(cpu, 4);
    r.enter("c");
    assert_eq!(exec_n(&mut r, 100), "\n100 Execution cycles exceeded.\n");
    r.interrupt();
    assert_eq!(exec(&mut r), "Interrupted at pc = 0x80000000\n");
    assert_eq!(r.state(), State::Stopped);
}
