use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use room_plan::{Layout, LayoutOptions, Placement, SectionInit, render_preview};

const GRID: i64 = 40;

/// A GRID x GRID checkerboard of 2x2 rooms, each linked to its left and top
/// neighbours through directional placement.
fn build_grid() -> Layout {
    let mut layout: Layout = Layout::new();
    let mut row_start = layout
        .add_section_with(0, 0, 1, 1, SectionInit::named("a"))
        .expect("seed");
    for row in 0..GRID {
        if row > 0 {
            row_start = layout
                .add_bottom(row_start, Placement::new(2, 2).named("r"))
                .expect("row start");
        }
        let mut cursor = row_start;
        for _ in 1..GRID {
            cursor = layout
                .add_right(cursor, Placement::new(2, 2).named("c"))
                .expect("cell");
        }
    }
    layout
}

fn placement(c: &mut Criterion) {
    c.bench_function("placement_grid_40x40", |b| {
        b.iter(|| black_box(build_grid()));
    });
}

fn queries(c: &mut Criterion) {
    let layout = build_grid();
    c.bench_function("sections_at_scan", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for i in 0..GRID * 2 {
                hits += layout.sections_at(black_box(i), black_box(i)).len();
            }
            hits
        });
    });
    c.bench_function("render_preview_80x80", |b| {
        b.iter(|| render_preview(black_box(&layout)));
    });
}

fn overlapping_stack(c: &mut Criterion) {
    c.bench_function("overlap_stack_z_order", |b| {
        b.iter(|| {
            let mut layout: Layout =
                Layout::with_options(LayoutOptions::default().with_overlap(true));
            let ids: Vec<_> = (0..200)
                .map(|i| layout.add_section(i % 7, i % 5, i % 7 + 10, i % 5 + 10))
                .collect::<Result<_, _>>()
                .expect("stack");
            for id in ids.iter().step_by(3) {
                layout.bring_to_front(*id).expect("present");
            }
            black_box(layout.delete_sections(5, 5).len())
        });
    });
}

criterion_group!(benches, placement, queries, overlapping_stack);
criterion_main!(benches);
