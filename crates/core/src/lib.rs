pub mod shared {
    pub mod constants;
    pub mod frame;
    pub mod model_resolver;
    pub mod region;
}

pub mod capture {
    pub mod domain {
        pub mod capture_error;
        pub mod frame_source;
    }
    pub mod infrastructure;
}

pub mod detection {
    pub mod domain {
        pub mod face_locator;
    }
    pub mod infrastructure;
}

pub mod lighting {
    pub mod domain {
        pub mod classification;
        pub mod lighting_label;
        pub mod lighting_reading;
        pub mod luminance;
    }
    pub mod lighting_estimator;
}

pub mod overlay {
    pub mod overlay_renderer;
    pub mod text;
}

pub mod display {
    pub mod domain {
        pub mod display_surface;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod annotate_image_use_case;
    pub mod pipeline_logger;
    pub mod run_loop;
}
