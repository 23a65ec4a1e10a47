use super::*;
use crate::mach::State;

#[test]
fn test_continue_to_good_trap() {
    let mut r = Runtime::default();
    r.enter("c");
    assert_eq!(run(&mut r), "HIT GOOD TRAP at pc = 0x8000001c\n");
    assert_eq!(r.state(), State::Ended { pc: 0x8000_001c, code: 0 });
    r.enter("c");
    assert_eq!(
        run(&mut r),
        "?program execution has ended; restart the debugger to run it again\n"
    );
}

#[test]
fn test_step_and_print() {
    let mut r = Runtime::default();
    r.enter("si 2");
    assert_eq!(run(&mut r), "");
    r.enter("p $pc");
    assert_eq!(run(&mut r), "0x80000008  2147483656\n");
    r.enter("p $t1 == 0x80001000");
    assert_eq!(run(&mut r), "0x00000001  1\n");
    r.enter("si");
    assert_eq!(run(&mut r), "");
    r.enter("p $t0");
    assert_eq!(run(&mut r), "0x00000001  1\n");
}

#[test]
fn test_watchpoint_fires_on_each_store() {
    let mut r = Runtime::default();
    r.enter("w *0x80001000");
    assert_eq!(run(&mut r), "Hardware watchpoint 0: *0x80001000\n");
    for n in 1..=5 {
        r.enter("c");
        assert_eq!(
            run(&mut r),
            format!(
                "Hardware watchpoint 0: *0x80001000\n\nOld value = {:#010x}\nNew value = {:#010x}\n",
                n - 1,
                n
            )
        );
        assert_eq!(r.state(), State::Stopped);
        assert_eq!(r.cpu().pc(), 0x8000_0010);
    }
    r.enter("c");
    assert_eq!(run(&mut r), "HIT GOOD TRAP at pc = 0x8000001c\n");
}

#[test]
fn test_failing_watch_expression_stops() {
    let mut r = Runtime::default();
    r.enter("w 1/(5-$t0)");
    run(&mut r);
    r.enter("c");
    assert_eq!(
        run(&mut r),
        "Hardware watchpoint 0: 1/(5-$t0)\n\nOld value = 0x00000000\nNew value = 0x00000001\n"
    );
    r.enter("c");
    assert_eq!(
        run(&mut r),
        "?expression evaluation failed: division by zero\n"
    );
    assert_eq!(r.state(), State::Stopped);
}

#[test]
fn test_watch_rejects_bad_expression() {
    let mut r = Runtime::default();
    r.enter("w $zz");
    assert_eq!(
        run(&mut r),
        "?expression evaluation failed: bad register: no register named $zz\n"
    );
    assert!(r.watchpoints().is_empty());
    assert_eq!(r.watchpoints().free_len(), 32);
}

#[test]
fn test_info_and_delete() {
    let mut r = Runtime::default();
    r.enter("w $t0");
    r.enter("w $t1 + 1");
    run(&mut r);
    r.enter("info w");
    assert_eq!(run(&mut r), "Num     What\n1       $t1 + 1\n0       $t0\n");
    r.enter("d 0");
    r.enter("d 0");
    assert_eq!(
        run(&mut r),
        "Deleted watchpoint 0\n?watchpoint 0 not found\n"
    );
    r.enter("info w");
    assert_eq!(run(&mut r), "Num     What\n1       $t1 + 1\n");
}

#[test]
fn test_examine() {
    let mut r = Runtime::default();
    r.enter("x 5 $pc");
    assert_eq!(
        run(&mut r),
        "0x80000000: 0x00000293 0x80001337 0x00128293 0x00532023\n0x80000010: 0x00500393\n"
    );
    r.enter("x 1 0");
    assert_eq!(
        run(&mut r),
        "?address 0x00000000 (width 4) is out of bound of pmem\n"
    );
}

#[test]
fn test_interrupt_at_step_boundary() {
    let mut r = Runtime::default();
    r.enter("c");
    assert!(matches!(r.execute(3), Event::Running));
    r.interrupt();
    assert_eq!(run(&mut r), "Interrupted at pc = 0x8000000c\n");
    assert_eq!(r.state(), State::Stopped);
}

#[test]
fn test_errors_leave_state_alone() {
    let mut r = Runtime::default();
    r.enter("si 3");
    run(&mut r);
    r.enter("p (1");
    r.enter("p 5/0");
    r.enter("frob");
    assert_eq!(
        run(&mut r),
        "?expression evaluation failed: unbalanced parentheses\n\
         ?expression evaluation failed: division by zero\n\
         ?unknown command 'frob'\n"
    );
    assert_eq!(r.cpu().pc(), 0x8000_000c);
    assert_eq!(r.state(), State::Stopped);
}

#[test]
fn test_blank_lines_are_not_history() {
    let mut r = Runtime::default();
    assert!(!r.enter("   "));
    assert!(r.enter("help"));
    assert!(run(&mut r).starts_with("help - "));
}

#[test]
fn test_quit() {
    let mut r = Runtime::default();
    r.enter("q");
    assert!(matches!(r.execute(10), Event::Quit));
}
