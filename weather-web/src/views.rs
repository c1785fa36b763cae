//! Plain string-built HTML views.
//!
//! There is no template engine; each view is a formatting function over its
//! data contract, with user-supplied text escaped.

use weather_core::WeatherResult;

/// Escape user-supplied text for interpolation into markup.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape(title),
    )
}

/// Search form served from `GET /`.
pub fn home_page() -> String {
    page(
        "Weather Search",
        "<h1>Weather Search</h1>\n\
         <form method=\"post\" action=\"/\">\n\
         <label for=\"cityName\">City name</label>\n\
         <input id=\"cityName\" name=\"cityName\" type=\"text\" placeholder=\"e.g. London\">\n\
         <button type=\"submit\">Get Weather</button>\n\
         </form>",
    )
}

/// Current conditions card.
pub fn weather_page(weather: &WeatherResult) -> String {
    let body = format!(
        "<h1>Weather in {location}</h1>\n\
         <img src=\"{image}\" alt=\"{description}\">\n\
         <p>{description}</p>\n\
         <ul>\n\
         <li>Temperature: {temperature}</li>\n\
         <li>Humidity: {humidity}%</li>\n\
         <li>Wind speed: {wind_speed}</li>\n\
         <li>Pressure: {pressure} hPa</li>\n\
         </ul>\n\
         <p><a href=\"/\">Search again</a></p>",
        location = escape(&weather.location),
        image = escape(&weather.image_url),
        description = escape(&weather.description),
        temperature = weather.temperature,
        humidity = weather.humidity,
        wind_speed = weather.wind_speed,
        pressure = weather.pressure,
    );
    page(&format!("Weather in {}", weather.location), &body)
}

/// Uniform error view carrying `{title, message, status_code}`.
pub fn error_page(title: &str, message: &str, status_code: u16) -> String {
    let body = format!(
        "<h1>{status_code} - {title}</h1>\n\
         <p>{message}</p>\n\
         <p><a href=\"/\">Back to search</a></p>",
        title = escape(title),
        message = escape(message),
    );
    page(title, &body)
}
