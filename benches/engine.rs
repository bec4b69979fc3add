use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;
use shellframe::logging::{LogEvent, LogSink};
use shellframe::{
    EngineOptions, Layout, LayoutEvent, LayoutSnapshot, Logger, LoggingObserver, LoggingResult,
    ModeField, Region, SectionPolicy, SidebarSlot, SizeParams, SlotPresence, compute_geometry,
    normalize_value,
};

#[derive(Clone, Default)]
struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _event: &LogEvent) -> LoggingResult<()> {
        Ok(())
    }
}

fn build_layout() -> Layout {
    let config = normalize_value(
        &json!({
            "modes": { "theme": "dark", "sidebar": "base" },
            "slots": { "body": "page", "header": "brand", "footer": "status" },
            "classNames": { "body": "main" },
        }),
        SectionPolicy::Strict,
    )
    .expect("config");
    let mut options = EngineOptions::new().with_logger(Logger::new(NullSink));
    options.enable_metrics();
    Layout::with_options(config, options)
}

fn toggle_round_trip(c: &mut Criterion) {
    let layout = build_layout();
    layout
        .register_slot(Region::Sidebar, "nav", "")
        .expect("register sidebar");
    c.bench_function("toggle_round_trip", |b| {
        b.iter(|| {
            for field in ModeField::ALL {
                layout.toggle_mode(black_box(field)).expect("toggle");
                layout.toggle_mode(black_box(field)).expect("toggle");
            }
        });
    });
}

fn toggle_with_observers(c: &mut Criterion) {
    let layout = build_layout();
    layout
        .subscribe(LoggingObserver::new(Logger::new(NullSink)).log_geometry(true))
        .expect("subscribe");
    layout
        .subscribe(|_: &LayoutEvent, snapshot: &LayoutSnapshot| {
            black_box(snapshot.has_sidebar());
        })
        .expect("subscribe");
    c.bench_function("toggle_with_observers", |b| {
        b.iter(|| {
            layout
                .toggle_sidebar_collapsed_mode()
                .expect("toggle");
        });
    });
}

fn derive_geometry(c: &mut Criterion) {
    let sizes = SizeParams::default();
    let presence = SlotPresence::all();
    let layout = build_layout();
    let modes = layout.modes().expect("modes");
    c.bench_function("compute_geometry", |b| {
        b.iter(|| compute_geometry(black_box(&modes), black_box(&sizes), black_box(&presence)));
    });
    c.bench_function("finalize_with_sidebar", |b| {
        let sidebar = layout.open_sidebar().expect("sidebar");
        sidebar
            .register_slot(SidebarSlot::Header, "brand", "")
            .expect("register");
        b.iter(|| layout.finalize().expect("frame"));
    });
}

fn slot_churn(c: &mut Criterion) {
    let layout = build_layout();
    c.bench_function("acquire_release_slot", |b| {
        b.iter(|| {
            let guard = layout
                .acquire_slot(Region::Infobar, black_box("details"), "panel")
                .expect("acquire");
            drop(guard);
        });
    });
}

criterion_group!(
    benches,
    toggle_round_trip,
    toggle_with_observers,
    derive_geometry,
    slot_churn
);
criterion_main!(benches);
