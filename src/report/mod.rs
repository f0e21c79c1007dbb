//! Report model construction and HTML rendering

mod charts;
mod html;
mod model;
mod period;

pub use html::{footer_template, header_template, render_document};
pub use model::{
    build_model, ChannelMix, ReportModel, StarRatings, TrendSeries, FALLBACK_COMPANY_CITY,
    FALLBACK_COMPANY_INDUSTRY, FALLBACK_COMPANY_NAME,
};
pub use period::{parse_report_date, ReportPeriod};
