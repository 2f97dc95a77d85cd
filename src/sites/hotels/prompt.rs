use super::models::validate_stay;
use crate::{ScraperError, ScraperResult};
use chrono::NaiveDate;
use std::io::{BufRead, Write};

const DATE_FORMAT: &str = "%m/%d/%Y";

/// Line-oriented questionnaire for the hotel search. Each question is asked
/// until it gets a valid answer; running out of input is an error.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> ScraperResult<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ScraperError::InputError(
                "input ended before a valid answer was given".to_string(),
            ));
        }
        Ok(line.trim().to_string())
    }

    fn complain(&mut self, message: &str) -> ScraperResult<()> {
        writeln!(self.output, "Error: {message}\n")?;
        Ok(())
    }

    pub fn read_dates(&mut self, today: NaiveDate) -> ScraperResult<(NaiveDate, NaiveDate)> {
        loop {
            let checkin = self.ask("Enter check-in date (MM/DD/YYYY): ")?;
            let checkout = self.ask("Enter check-out date (MM/DD/YYYY): ")?;

            let parsed = NaiveDate::parse_from_str(&checkin, DATE_FORMAT).and_then(|checkin| {
                NaiveDate::parse_from_str(&checkout, DATE_FORMAT).map(|checkout| (checkin, checkout))
            });
            let Ok((checkin, checkout)) = parsed else {
                self.complain("Invalid date format. Please use MM/DD/YYYY format.")?;
                continue;
            };

            match validate_stay(checkin, checkout, today) {
                Ok(()) => return Ok((checkin, checkout)),
                Err(message) => self.complain(&format!("{message} Please try again."))?,
            }
        }
    }

    pub fn read_max_price(&mut self) -> ScraperResult<Option<u32>> {
        loop {
            let answer =
                self.ask("Enter maximum price per night (USD, or press Enter for no limit): ")?;
            if answer.is_empty() {
                return Ok(None);
            }

            match answer.parse::<f64>() {
                Ok(price) if price.is_nan() || price <= 0.0 => {
                    self.complain("Price must be greater than 0. Please try again.")?
                }
                Ok(price) if price.is_finite() && price <= f64::from(u32::MAX) => {
                    return Ok(Some(price.trunc() as u32))
                }
                _ => self.complain("Invalid price format. Please enter a number.")?,
            }
        }
    }

    pub fn read_min_stars(&mut self) -> ScraperResult<Option<u8>> {
        loop {
            let answer = self.ask("Enter minimum star rating (1-5, or press Enter for no filter): ")?;
            if answer.is_empty() {
                return Ok(None);
            }

            match answer.parse::<i64>() {
                Ok(stars @ 1..=5) => return Ok(Some(stars as u8)),
                Ok(_) => self.complain("Star rating must be between 1 and 5. Please try again.")?,
                Err(_) => self.complain(
                    "Invalid star rating. Please enter a number between 1 and 5.",
                )?,
            }
        }
    }

    pub fn read_min_reviews(&mut self) -> ScraperResult<Option<u32>> {
        loop {
            let answer =
                self.ask("Enter minimum number of reviews (or press Enter for no filter): ")?;
            if answer.is_empty() {
                return Ok(None);
            }

            match answer.parse::<i64>() {
                Ok(n) if n < 0 => self.complain(
                    "Number of reviews cannot be negative. Please try again.",
                )?,
                Ok(n) => match u32::try_from(n) {
                    Ok(n) => return Ok(Some(n)),
                    Err(_) => self.complain("Invalid number of reviews. Please enter a number.")?,
                },
                Err(_) => self.complain("Invalid number of reviews. Please enter a number.")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn transcript(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.output).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn dates_reprompt_until_valid() {
        let mut p = prompter(
            "2026-11-01\n11/04/2026\n\
             11/04/2026\n11/01/2026\n\
             10/01/2026\n10/05/2026\n\
             11/01/2026\n11/04/2026\n",
        );

        let (checkin, checkout) = p.read_dates(today()).unwrap();
        assert_eq!(checkin, NaiveDate::from_ymd_opt(2026, 11, 1).unwrap());
        assert_eq!(checkout, NaiveDate::from_ymd_opt(2026, 11, 4).unwrap());

        let out = transcript(p);
        assert!(out.contains("Invalid date format"));
        assert!(out.contains("Check-out date must be after check-in date"));
        assert!(out.contains("Check-in date cannot be in the past"));
    }

    #[test]
    fn check_in_today_is_rejected() {
        let mut p = prompter("10/18/2026\n10/20/2026\n10/19/2026\n10/20/2026\n");
        let (checkin, _) = p.read_dates(today()).unwrap();
        assert_eq!(checkin, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert!(transcript(p).contains("Check-in date cannot be in the past"));
    }

    #[test]
    fn end_of_input_is_an_error() {
        let mut p = prompter("garbage\n");
        assert!(matches!(
            p.read_dates(today()),
            Err(ScraperError::InputError(_))
        ));
    }

    #[test]
    fn max_price_truncates_and_allows_skip() {
        assert_eq!(prompter("\n").read_max_price().unwrap(), None);
        assert_eq!(prompter("abc\n-5\n0\n199.99\n").read_max_price().unwrap(), Some(199));

        let mut p = prompter("inf\nNaN\n80\n");
        assert_eq!(p.read_max_price().unwrap(), Some(80));
        let out = transcript(p);
        assert!(out.contains("Invalid price format"));
        assert!(out.contains("Price must be greater than 0"));
    }

    #[test]
    fn min_stars_must_be_one_to_five() {
        let mut p = prompter("0\n6\n3.5\n4\n");
        assert_eq!(p.read_min_stars().unwrap(), Some(4));
        let out = transcript(p);
        assert_eq!(out.matches("must be between 1 and 5").count(), 2);
        assert!(out.contains("Invalid star rating"));
    }

    #[test]
    fn min_reviews_rejects_negative() {
        let mut p = prompter("-1\nlots\n0\n");
        assert_eq!(p.read_min_reviews().unwrap(), Some(0));
        let out = transcript(p);
        assert!(out.contains("cannot be negative"));
        assert!(out.contains("Invalid number of reviews"));
        assert_eq!(prompter("  \n").read_min_reviews().unwrap(), None);
    }
}
