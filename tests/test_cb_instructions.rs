mod common;

use common::{cpu_with_program, step_once, PROGRAM_START};

/// Runs a single prefixed opcode on register B with the given carry flag. Returns the result,
/// zero and carry.
fn run_on_b(opcode: u8, value: u8, carry: bool) -> (u8, bool, bool) {
    let mut cpu = cpu_with_program(&[0xCB, opcode]);
    cpu.registers.b = value;
    cpu.registers.f.carry = carry;
    assert_eq!(2, step_once(&mut cpu));
    assert_eq!(PROGRAM_START + 2, cpu.pc);
    (cpu.registers.b, cpu.registers.f.zero, cpu.registers.f.carry)
}

#[test]
fn test_rlc() {
    assert_eq!((0x0b, false, true), run_on_b(0x00, 0x85, false));
    assert_eq!((0x00, true, false), run_on_b(0x00, 0x00, true));
}

#[test]
fn test_rrc() {
    assert_eq!((0x80, false, true), run_on_b(0x08, 0x01, false));
    assert_eq!((0x42, false, false), run_on_b(0x08, 0x84, true));
}

#[test]
fn test_rl_shifts_carry_in() {
    assert_eq!((0x00, true, true), run_on_b(0x10, 0x80, false));
    assert_eq!((0x01, false, true), run_on_b(0x10, 0x80, true));
    assert_eq!((0x03, false, false), run_on_b(0x10, 0x01, true));
}

#[test]
fn test_rr_shifts_carry_in() {
    assert_eq!((0x80, false, true), run_on_b(0x18, 0x01, true));
    assert_eq!((0x00, true, true), run_on_b(0x18, 0x01, false));
}

#[test]
fn test_sla() {
    assert_eq!((0xfe, false, true), run_on_b(0x20, 0xff, false));
    assert_eq!((0x00, true, true), run_on_b(0x20, 0x80, false));
}

#[test]
fn test_sra_keeps_sign_bit() {
    assert_eq!((0xc0, false, true), run_on_b(0x28, 0x81, false));
    assert_eq!((0x20, false, false), run_on_b(0x28, 0x40, true));
}

#[test]
fn test_srl_fills_with_zero() {
    assert_eq!((0x40, false, true), run_on_b(0x38, 0x81, false));
    assert_eq!((0x00, true, true), run_on_b(0x38, 0x01, false));
}

#[test]
fn test_swap_clears_carry() {
    assert_eq!((0x1f, false, false), run_on_b(0x30, 0xf1, true));
    assert_eq!((0x00, true, false), run_on_b(0x30, 0x00, true));
}

#[test]
fn test_bit_only_touches_zero() {
    // bit 7, h
    let mut cpu = cpu_with_program(&[0xCB, 0x7C, 0xCB, 0x7C]);
    cpu.registers.h = 0x80;
    cpu.registers.f.carry = true;
    step_once(&mut cpu);
    assert!(!cpu.registers.f.zero);
    assert!(cpu.registers.f.carry);
    assert_eq!(0x80, cpu.registers.h);

    cpu.registers.h = 0x7f;
    step_once(&mut cpu);
    assert!(cpu.registers.f.zero);
    assert!(cpu.registers.f.carry);
}

#[test]
fn test_set_and_res_leave_flags() {
    // set 7, b; res 0, a
    let mut cpu = cpu_with_program(&[0xCB, 0xF8, 0xCB, 0x87]);
    cpu.registers.a = 0xff;
    cpu.registers.f.zero = true;
    cpu.registers.f.carry = true;

    step_once(&mut cpu);
    assert_eq!(0x80, cpu.registers.b);
    step_once(&mut cpu);
    assert_eq!(0xfe, cpu.registers.a);
    assert!(cpu.registers.f.zero);
    assert!(cpu.registers.f.carry);
}

#[test]
fn test_memory_operand_timings() {
    // rlc [hl]; bit 0, [hl]; set 1, [hl]
    let mut cpu = cpu_with_program(&[0xCB, 0x06, 0xCB, 0x46, 0xCB, 0xCE]);
    cpu.registers.set_hl(0xc000);
    cpu.write_u8(0xc000, 0x80);

    assert_eq!(4, step_once(&mut cpu));
    assert_eq!(0x01, cpu.read_u8(0xc000));
    assert!(cpu.registers.f.carry);

    assert_eq!(3, step_once(&mut cpu));
    assert!(!cpu.registers.f.zero);

    assert_eq!(4, step_once(&mut cpu));
    assert_eq!(0x03, cpu.read_u8(0xc000));
    assert_eq!(PROGRAM_START + 6, cpu.pc);
}

#[test]
fn test_accumulator_rotates_clear_zero() {
    // rlca; rla; rrca; rra
    let mut cpu = cpu_with_program(&[0x07, 0x17, 0x0F, 0x1F]);
    cpu.registers.a = 0x80;
    assert_eq!(1, step_once(&mut cpu));
    assert_eq!(0x01, cpu.registers.a);
    assert!(cpu.registers.f.carry);

    cpu.registers.a = 0x80;
    cpu.registers.f.carry = false;
    step_once(&mut cpu);
    assert_eq!(0x00, cpu.registers.a);
    assert!(!cpu.registers.f.zero);
    assert!(cpu.registers.f.carry);

    cpu.registers.a = 0x01;
    step_once(&mut cpu);
    assert_eq!(0x80, cpu.registers.a);
    assert!(cpu.registers.f.carry);

    cpu.registers.a = 0x01;
    cpu.registers.f.carry = false;
    step_once(&mut cpu);
    assert_eq!(0x00, cpu.registers.a);
    assert!(!cpu.registers.f.zero);
    assert!(cpu.registers.f.carry);
    assert_eq!(PROGRAM_START + 4, cpu.pc);
}
