pub mod headless_display;
pub mod minifb_display;
