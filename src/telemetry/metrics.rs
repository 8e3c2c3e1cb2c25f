use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::LazyLock;

pub static METER: LazyLock<Meter> = LazyLock::new(|| global::meter("family-engagement"));

pub static HTTP_REQUESTS_TOTAL: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("http.requests.total")
        .with_description("Total number of HTTP requests")
        .with_unit("{request}")
        .build()
});

pub static HTTP_REQUEST_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("http.request.duration")
        .with_description("HTTP request duration in milliseconds")
        .with_unit("ms")
        .with_boundaries(vec![
            1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0,
        ])
        .build()
});

pub static USERS_REGISTERED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("users.registered")
        .with_description("Total users registered")
        .build()
});

pub static HOUSEHOLDS_CREATED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("households.created")
        .with_description("Total households created")
        .build()
});

pub static ACTIVITIES_RECORDED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("activities.recorded")
        .with_description("Total family activities recorded")
        .build()
});

pub static ACHIEVEMENTS_UNLOCKED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("achievements.unlocked")
        .with_description("Total achievements unlocked across households")
        .build()
});

pub static MILESTONES_COMPLETED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("milestones.completed")
        .with_description("Total milestones completed across households")
        .build()
});

pub static SNAPSHOTS_COMPUTED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("engagement.snapshots.computed")
        .with_description("Family health metric snapshots served")
        .build()
});
