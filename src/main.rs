use std::process::exit;

use flowtag_lib::FlowTagError;

fn main() {
    if let Err(err) = flowtag_lib::run() {
        let kind = err
            .downcast_ref::<FlowTagError>()
            .map(FlowTagError::kind)
            .unwrap_or("Other");
        tracing::error!(kind, "flowtag failed: {err:#}");
        exit(1);
    }
}
