use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};

lazy_static! {
    /// Posts written since process start.
    pub static ref POSTS_CREATED_TOTAL: IntCounter = register_int_counter!(
        "blog_posts_created_total",
        "Total posts created"
    )
    .expect("failed to register blog_posts_created_total");

    /// Successful like increments.
    pub static ref POST_LIKES_TOTAL: IntCounter = register_int_counter!(
        "blog_post_likes_total",
        "Total likes recorded across all posts"
    )
    .expect("failed to register blog_post_likes_total");

    /// Tag links written by create/update re-synchronization.
    pub static ref TAGS_SYNCED_TOTAL: IntCounter = register_int_counter!(
        "blog_tags_synced_total",
        "Total post-tag links written during tag synchronization"
    )
    .expect("failed to register blog_tags_synced_total");

    /// Policy denials by operation (create/update/delete).
    pub static ref PERMISSION_DENIED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "blog_permission_denied_total",
        "Requests rejected by the ownership policy segmented by operation",
        &["operation"]
    )
    .expect("failed to register blog_permission_denied_total");

    /// Request latency recorded by the metrics middleware.
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration segmented by method and status",
        &["method", "status"]
    )
    .expect("failed to register http_request_duration_seconds");
}
