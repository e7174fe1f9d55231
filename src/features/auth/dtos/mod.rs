mod auth_dto;

pub use auth_dto::{
    AuthUserDto, LoginRequestDto, LoginResponseDto, RegisterRequestDto, RegisterResponseDto,
};
