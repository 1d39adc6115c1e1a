pub mod idle_window_algorithm;
