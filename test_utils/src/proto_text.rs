use prost_reflect::{text_format::ParseError, DynamicMessage, ReflectMessage};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixtureParseError {
    #[error("failed to parse text proto as {type_name}: {source}")]
    Parse {
        type_name: String,
        #[source]
        source: ParseError,
    },
    #[error("failed to convert text proto into {type_name}: {source}")]
    Transcode {
        type_name: String,
        #[source]
        source: prost::DecodeError,
    },
}

pub fn try_create_from_text<T>(textual_proto: &str) -> Result<T, FixtureParseError>
where
    T: ReflectMessage + Default,
{
    let descriptor = T::default().descriptor();
    let type_name = descriptor.full_name().to_owned();
    let message = DynamicMessage::parse_text_format(descriptor, textual_proto).map_err(|source| {
        FixtureParseError::Parse {
            type_name: type_name.clone(),
            source,
        }
    })?;
    message
        .transcode_to::<T>()
        .map_err(|source| FixtureParseError::Transcode { type_name, source })
}

/// Creates a message of type `T` from its text format.
///
/// A fixture that does not parse is a bug in the test, so this panics instead
/// of returning an error. Use [`try_create_from_text`] to inspect the error.
#[track_caller]
pub fn create_from_text<T>(textual_proto: &str) -> T
where
    T: ReflectMessage + Default,
{
    match try_create_from_text(textual_proto) {
        Ok(message) => message,
        Err(err) => panic!("{err}\ntext proto:\n{textual_proto}"),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proto::model_server::{GetModelStatusResponse, ModelSpec, ModelState, ModelVersionStatus};

    use super::{create_from_text, try_create_from_text, FixtureParseError};

    #[test]
    fn parses_every_field() {
        let spec: ModelSpec = create_from_text(
            r#"
            name: "half_plus_two"
            version: 123
            signature_name: "serving_default"
            "#,
        );
        pretty_assertions::assert_eq!(
            spec,
            ModelSpec {
                name: String::from("half_plus_two"),
                version: 123,
                signature_name: String::from("serving_default"),
            }
        );
    }

    #[test]
    fn parses_nested_and_repeated_fields() {
        let response = create_from_text::<GetModelStatusResponse>(
            r#"
            model_version_status { version: 1 state: END }
            model_version_status { version: 2 state: AVAILABLE }
            "#,
        );
        pretty_assertions::assert_eq!(
            response.model_version_status,
            vec![
                ModelVersionStatus {
                    version: 1,
                    state: ModelState::End.into(),
                    error_message: String::new(),
                },
                ModelVersionStatus {
                    version: 2,
                    state: ModelState::Available.into(),
                    error_message: String::new(),
                },
            ]
        );
    }

    #[test]
    fn empty_text_is_the_default_message() {
        assert_eq!(create_from_text::<ModelSpec>(""), ModelSpec::default());
    }

    #[test]
    fn unknown_field_is_an_error() {
        let result = try_create_from_text::<ModelSpec>("model_name: \"resnet\"");
        assert_matches!(
            result,
            Err(FixtureParseError::Parse { type_name, .. }) if type_name == "serving.fixtures.ModelSpec"
        );
    }

    #[test]
    fn wrong_value_type_is_an_error() {
        let result = try_create_from_text::<ModelSpec>("version: \"latest\"");
        assert_matches!(result, Err(FixtureParseError::Parse { .. }));
    }

    #[test]
    #[should_panic(expected = "failed to parse text proto as serving.fixtures.ModelSpec")]
    fn create_from_text_panics_on_bad_fixture() {
        create_from_text::<ModelSpec>("version: twelve");
    }
}
