pub mod chart_sync;
