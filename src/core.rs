pub mod comparison;
pub mod daily;
pub mod device;
pub mod energy;
pub mod heatmap;
pub mod kpi;
pub mod measure;
pub mod plant;
pub mod reading;
pub mod report;
pub mod series;
pub mod staleness;
pub mod status;
pub mod window;
