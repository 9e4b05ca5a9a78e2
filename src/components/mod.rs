pub mod telemetry_canvas;
