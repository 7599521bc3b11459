mod common;

use common::{cpu_with_program, reg_index, step_once, PROGRAM_START};
use gameboy_cpu::cpu::Reg;
use strum::IntoEnumIterator;

#[test]
fn test_ld_register_to_register() {
    for target in Reg::iter() {
        for source in Reg::iter() {
            let opcode = 0b0100_0000 | reg_index(target) << 3 | reg_index(source);
            let mut cpu = cpu_with_program(&[opcode]);
            cpu.registers.f.zero = true;
            cpu.set_register(source, 0x5a);

            assert_eq!(1, step_once(&mut cpu));
            assert_eq!(0x5a, cpu.get_register(target), "ld {}, {}", target, source);
            assert!(cpu.registers.f.zero);
            assert_eq!(PROGRAM_START + 1, cpu.pc);
        }
    }
}

#[test]
fn test_ld_register_immediate() {
    for reg in Reg::iter() {
        let opcode = 0b0000_0110 | reg_index(reg) << 3;
        let mut cpu = cpu_with_program(&[opcode, 0x42]);
        assert_eq!(2, step_once(&mut cpu));
        assert_eq!(0x42, cpu.get_register(reg));
        assert_eq!(PROGRAM_START + 2, cpu.pc);
    }
}

#[test]
fn test_ld_through_hl() {
    // ld b, [hl]; ld [hl], c; ld [hl], 0x99
    let mut cpu = cpu_with_program(&[0x46, 0x71, 0x36, 0x99]);
    cpu.registers.h = 0xc1;
    cpu.registers.l = 0x23;
    cpu.write_u8(0xc123, 0x77);
    cpu.registers.c = 0x11;

    assert_eq!(2, step_once(&mut cpu));
    assert_eq!(0x77, cpu.registers.b);

    assert_eq!(2, step_once(&mut cpu));
    assert_eq!(0x11, cpu.read_u8(0xc123));

    assert_eq!(3, step_once(&mut cpu));
    assert_eq!(0x99, cpu.read_u8(0xc123));
    assert_eq!(PROGRAM_START + 4, cpu.pc);
}

#[test]
fn test_ld_word_immediate() {
    // ld bc, 0x1234; ld sp, 0xfff0
    let mut cpu = cpu_with_program(&[0x01, 0x34, 0x12, 0x31, 0xf0, 0xff]);
    assert_eq!(3, step_once(&mut cpu));
    assert_eq!((0x12, 0x34), (cpu.registers.b, cpu.registers.c));
    assert_eq!(3, step_once(&mut cpu));
    assert_eq!(0xfff0, cpu.sp);
    assert_eq!(PROGRAM_START + 6, cpu.pc);
}

#[test]
fn test_ld_accumulator_through_pairs() {
    // ld [bc], a; ld a, [de]
    let mut cpu = cpu_with_program(&[0x02, 0x1A]);
    cpu.registers.a = 0x3c;
    cpu.registers.set_bc(0xc000);
    cpu.registers.set_de(0xc001);
    cpu.write_u8(0xc001, 0x81);

    assert_eq!(2, step_once(&mut cpu));
    assert_eq!(0x3c, cpu.read_u8(0xc000));
    assert_eq!(2, step_once(&mut cpu));
    assert_eq!(0x81, cpu.registers.a);
}

#[test]
fn test_ld_increment_and_decrement_hl() {
    // ld [hl+], a; ld a, [hl-]; ld [hl-], a
    let mut cpu = cpu_with_program(&[0x22, 0x3A, 0x32]);
    cpu.registers.a = 0xaa;
    cpu.registers.set_hl(0xc0ff);
    cpu.write_u8(0xc100, 0xbb);

    step_once(&mut cpu);
    assert_eq!(0xaa, cpu.read_u8(0xc0ff));
    assert_eq!(0xc100, cpu.registers.get_hl());

    step_once(&mut cpu);
    assert_eq!(0xbb, cpu.registers.a);
    assert_eq!(0xc0ff, cpu.registers.get_hl());

    cpu.registers.set_hl(0x0000);
    cpu.registers.a = 0x01;
    step_once(&mut cpu);
    assert_eq!(0x01, cpu.read_u8(0x0000));
    assert_eq!(0xffff, cpu.registers.get_hl());
}

#[test]
fn test_ld_a_from_hl_increment() {
    // ld a, [hl+]
    let mut cpu = cpu_with_program(&[0x2A]);
    cpu.registers.set_hl(0xffff);
    cpu.write_u8(0xffff, 0x12);
    assert_eq!(2, step_once(&mut cpu));
    assert_eq!(0x12, cpu.registers.a);
    assert_eq!(0x0000, cpu.registers.get_hl());
}

#[test]
fn test_high_page_loads() {
    // ldh [0x80], a; ldh a, [0x81]; ld [c], a; ld a, [c]
    let mut cpu = cpu_with_program(&[0xE0, 0x80, 0xF0, 0x81, 0xE2, 0xF2]);
    cpu.registers.a = 0x01;
    cpu.write_u8(0xff81, 0x02);

    assert_eq!(3, step_once(&mut cpu));
    assert_eq!(0x01, cpu.read_u8(0xff80));
    assert_eq!(3, step_once(&mut cpu));
    assert_eq!(0x02, cpu.registers.a);

    cpu.registers.c = 0x90;
    assert_eq!(2, step_once(&mut cpu));
    assert_eq!(0x02, cpu.read_u8(0xff90));

    cpu.write_u8(0xff90, 0x03);
    assert_eq!(2, step_once(&mut cpu));
    assert_eq!(0x03, cpu.registers.a);
    assert_eq!(PROGRAM_START + 6, cpu.pc);
}

#[test]
fn test_absolute_loads() {
    // ld [0xc010], a; ld a, [0xc011]; ld [0xc020], sp
    let mut cpu = cpu_with_program(&[0xEA, 0x10, 0xc0, 0xFA, 0x11, 0xc0, 0x08, 0x20, 0xc0]);
    cpu.registers.a = 0x44;
    cpu.write_u8(0xc011, 0x55);
    cpu.sp = 0xbeef;

    assert_eq!(4, step_once(&mut cpu));
    assert_eq!(0x44, cpu.read_u8(0xc010));
    assert_eq!(4, step_once(&mut cpu));
    assert_eq!(0x55, cpu.registers.a);
    assert_eq!(5, step_once(&mut cpu));
    assert_eq!(0xef, cpu.read_u8(0xc020));
    assert_eq!(0xbe, cpu.read_u8(0xc021));
    assert_eq!(PROGRAM_START + 9, cpu.pc);
}

#[test]
fn test_ld_sp_hl() {
    let mut cpu = cpu_with_program(&[0xF9]);
    cpu.registers.set_hl(0xd000);
    assert_eq!(2, step_once(&mut cpu));
    assert_eq!(0xd000, cpu.sp);
}
