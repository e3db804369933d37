use sea_orm::DbErr;

use crate::domain::error::DomainError;

pub(crate) fn db_err(e: DbErr) -> DomainError {
    DomainError::database(e.to_string())
}

/// Escape LIKE wildcards so user input matches literally (escape char `\`).
pub(crate) fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("salt"), "salt");
    }
}
