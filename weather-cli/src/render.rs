use std::fmt::Write;

use weather_core::{
    Screen,
    view::{CurrentPanel, ForecastCard, WeatherScreen},
};

pub fn render_screen(screen: &Screen) -> String {
    match screen {
        Screen::Loading => "Loading...\n".to_string(),
        Screen::Failure { message } => format!("{message}\n"),
        Screen::Weather(weather) => render_weather(weather),
    }
}

fn render_weather(screen: &WeatherScreen) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Zip code: [{}]", screen.form.draft_zip_code);
    let _ = writeln!(out);
    render_current(&mut out, &screen.current);
    let _ = writeln!(out);
    for card in &screen.forecast {
        render_card(&mut out, card);
    }

    out
}

fn render_current(out: &mut String, current: &CurrentPanel) {
    let _ = writeln!(out, "{}", current.location);
    let _ = writeln!(out, "{}  ({})", current.description, current.icon_url);
    let _ = writeln!(
        out,
        "Now {}°F  Feels like {}°F  High {}°F  Low {}°F",
        current.temperature, current.feels_like, current.high, current.low
    );

    if let Some(extra) = &current.extra {
        let _ = writeln!(
            out,
            "Wind {:.1} mph  Humidity {}%  Pressure {} hPa",
            extra.wind_speed, extra.humidity, extra.pressure
        );
        let _ = writeln!(out, "Sunrise {}  Sunset {}", extra.sunrise, extra.sunset);
    }
}

fn render_card(out: &mut String, card: &ForecastCard) {
    let _ = writeln!(
        out,
        "{:<10} {:<24} {:>4}° / {}°",
        card.label, card.description, card.high, card.low
    );
}
