use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gameboy_cpu::cpu::Cpu;
use gameboy_cpu::Steppable;

fn repeat_regular_opcode(c: &mut Criterion, name: &str, opcode: u8) {
    let mut cpu = Cpu::new();
    cpu.load(0x0000, &[opcode]).unwrap();

    c.bench_function(name, |b| b.iter(|| cpu.step(black_box(0x0000), 100)));
}

fn repeat_nop(c: &mut Criterion) {
    repeat_regular_opcode(c, "nop", 0x00);
}

fn repeat_inc_b_reg(c: &mut Criterion) {
    repeat_regular_opcode(c, "inc-b", 0x04);
}

fn bench_run_frame(c: &mut Criterion) {
    // loop: inc b; jr loop
    let mut cpu = Cpu::new();
    cpu.load(0x0000, &[0x04, 0x18, 0xfd]).unwrap();

    c.bench_function("run frame", |b| {
        b.iter(|| black_box(cpu.run(0x0000, 17556)));
    });
}

criterion_group! {
    name = cpu_benches;
    config = Criterion::default().sample_size(500);
    targets = repeat_nop, repeat_inc_b_reg, bench_run_frame
}

criterion_main!(cpu_benches);
