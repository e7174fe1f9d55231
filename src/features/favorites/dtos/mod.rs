mod favorite_dto;

pub use favorite_dto::{AddFavoriteCityDto, FavoriteCityDto, ToggleNotificationsResponseDto};
