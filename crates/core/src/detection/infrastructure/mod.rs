pub mod rustface_locator;
