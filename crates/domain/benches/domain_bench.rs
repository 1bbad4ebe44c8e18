use common::{AggregateId, IndicatorCode};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::observation::events::{
    ComputationAddedData, ObservationCreatedData, RankedData,
};
use domain::{Aggregate, ComputationKind, EventRecord, Observation, ObservationEvent, replay};
use event_bus::Version;

fn created_data(area: &str) -> ObservationCreatedData {
    ObservationCreatedData {
        indicator: IndicatorCode::new("INDEX"),
        indicator_name: "The Index".to_string(),
        area: area.to_string(),
        area_name: area.to_string(),
        continent: Some("EUR".to_string()),
        area_type: Some("Emerging".to_string()),
        year: "2013".to_string(),
        value: Some(54.3),
        provider_name: None,
        provider_url: None,
        republish: true,
        tendency: 0,
    }
}

/// History of 1 Created plus `n` alternating computation/rank events.
fn history(n: usize) -> Vec<EventRecord<ObservationEvent>> {
    let id = AggregateId::new();
    let mut records = vec![EventRecord::new(
        id,
        Version::initial(),
        ObservationEvent::Created(created_data("ESP")),
    )];
    for i in 0..n {
        let event = if i % 2 == 0 {
            ObservationEvent::ComputationAdded(ComputationAddedData {
                kind: ComputationKind::Scored,
                value: i as f64,
            })
        } else {
            ObservationEvent::Ranked(RankedData { rank: i as i64 + 1 })
        };
        records.push(EventRecord::new(id, Version::new(i as i64 + 1), event));
    }
    records
}

fn replay_history(records: &[EventRecord<ObservationEvent>]) -> Observation {
    let mut state: Option<Observation> = None;
    for record in records {
        state = Some(replay(state, record).unwrap());
    }
    state.unwrap()
}

fn bench_replay_10_events(c: &mut Criterion) {
    let records = history(9);
    c.bench_function("domain/replay_10_events", |b| {
        b.iter(|| replay_history(&records));
    });
}

fn bench_replay_100_events(c: &mut Criterion) {
    let records = history(99);
    c.bench_function("domain/replay_100_events", |b| {
        b.iter(|| replay_history(&records));
    });
}

fn bench_apply_single_event(c: &mut Criterion) {
    let records = history(1);
    let base = replay_history(&records[..1]);
    let record = &records[1];
    c.bench_function("domain/apply_single_event", |b| {
        b.iter(|| Observation::apply(Some(base.clone()), record).unwrap());
    });
}

criterion_group!(
    benches,
    bench_replay_10_events,
    bench_replay_100_events,
    bench_apply_single_event
);
criterion_main!(benches);
