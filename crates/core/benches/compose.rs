use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nss_core::compose::{compose_nametable, compose_tile_sheet, BitmapLayout};
use nss_core::ppu::{AttributeTable, Nametable, PaletteSet, Pattern, RgbLookup};
use nss_core::rle;

/// 8KB of CHR data with some variety in every tile.
fn chr_data() -> Vec<u8> {
    (0..8192u32).map(|i| (i.wrapping_mul(37) >> 3) as u8).collect()
}

fn bench_rle_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("rle_decode");

    for runs in [16usize, 256, 1024].iter() {
        let token: String = (0..*runs).map(|i| format!("{:02X}[08]", i & 0xFF)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(runs), &token, |b, token| {
            b.iter(|| black_box(rle::decode("CHRMain", token).unwrap().len()));
        });
    }

    group.finish();
}

fn bench_tile_sheet(c: &mut Criterion) {
    let chr = chr_data();
    let patterns = Pattern::decode_range(&chr, 0, 256).unwrap();
    let sets = PaletteSet::decode_block(&[0x0F; 64]).unwrap();
    let lookup = RgbLookup::nes_default();

    let mut group = c.benchmark_group("tile_sheet");
    for layout in [BitmapLayout::Linear, BitmapLayout::Rect, BitmapLayout::Rect8x16] {
        group.bench_function(format!("{:?}", layout), |b| {
            b.iter(|| {
                let frame =
                    compose_tile_sheet(&patterns, &sets[0].palettes()[0], &lookup, layout).unwrap();
                black_box(frame.pixels.len());
            });
        });
    }
    group.finish();
}

fn bench_nametable(c: &mut Criterion) {
    let chr = chr_data();
    let patterns = Pattern::decode_range(&chr, 256, 256).unwrap();
    let sets = PaletteSet::decode_block(&[0x21; 64]).unwrap();
    let attributes = AttributeTable::decode(&[0b11_10_01_00; 64]).unwrap();
    let indices: Vec<u8> = (0..960u32).map(|i| i as u8).collect();
    let nametable = Nametable::decode(&indices).unwrap();
    let lookup = RgbLookup::nes_default();

    c.bench_function("nametable_256x240", |b| {
        b.iter(|| {
            let frame =
                compose_nametable(&patterns, &sets, &attributes, &nametable, 0, &lookup).unwrap();
            black_box(frame.pixels.len());
        });
    });
}

fn bench_attribute_decode(c: &mut Criterion) {
    let raw: Vec<u8> = (0..64u8).collect();
    c.bench_function("attribute_table_decode", |b| {
        b.iter(|| black_box(AttributeTable::decode(&raw).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_rle_decode,
    bench_tile_sheet,
    bench_nametable,
    bench_attribute_decode
);
criterion_main!(benches);
