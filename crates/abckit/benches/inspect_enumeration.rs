use abckit::{File, FileBuilder, FunctionDecl, Mode, Scope, Target};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn build(modules: usize, functions: usize) -> Vec<u8> {
    let mut builder = FileBuilder::new(Mode::Dynamic);
    for m in 0..modules {
        let module = builder.add_module(&format!("module{m}"), Target::Js).unwrap();
        for f in 0..functions {
            builder
                .add_function(Scope::Module(module), &format!("f{f}"), FunctionDecl::new())
                .unwrap();
        }
    }
    builder.build().to_bytes()
}

fn count_functions(file: &File) -> usize {
    let mut count = 0;
    file.file_enumerate_modules(|module| {
        file.module_enumerate_top_level_functions(module, |function| {
            black_box(file.function_get_name(function).unwrap());
            count += 1;
            true
        })
        .unwrap();
        true
    });
    count
}

fn bench_open(c: &mut Criterion) {
    let mut group = c.benchmark_group("open");
    for &(modules, functions) in &[(1, 16), (8, 64), (32, 128)] {
        let bytes = build(modules, functions);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("from_bytes", format!("{modules}x{functions}")),
            &bytes,
            |b, bytes| b.iter(|| File::from_bytes(black_box(bytes)).unwrap()),
        );
    }
    group.finish();
}

fn bench_enumerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("enumerate");
    for &(modules, functions) in &[(1, 16), (8, 64), (32, 128)] {
        let file = File::from_bytes(&build(modules, functions)).unwrap();
        group.throughput(Throughput::Elements((modules * functions) as u64));
        group.bench_with_input(
            BenchmarkId::new("function_names", format!("{modules}x{functions}")),
            &file,
            |b, file| b.iter(|| count_functions(black_box(file))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_open, bench_enumerate);
criterion_main!(benches);
