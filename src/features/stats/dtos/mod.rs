mod stats_dto;

pub use stats_dto::{
    CityCountDto, DailyCountDto, StatsDto, StatusCountDto, TopReporterDto, TypeCountDto,
};
