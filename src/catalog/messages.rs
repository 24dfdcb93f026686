//! Kafka and SQS message payloads

use crate::predicate::{Digest, Format, Predicate, TimestampFormat};
use crate::schema::Schema;

/// Identity carried base64-encoded in the `b64_identity` attribute
pub fn identity_schema() -> Schema {
    Schema::object()
        .required(
            "identity",
            Schema::object()
                .required(
                    "internal",
                    Schema::object()
                        .required("org_id", Predicate::int_in_string())
                        .optional("auth_time", Predicate::int()),
                )
                .required("account_number", Predicate::int_in_string())
                .optional("auth_type", Predicate::string())
                .optional(
                    "system",
                    Schema::object()
                        .optional("cn", Predicate::uuid())
                        .optional("cert_type", Predicate::string()),
                )
                .optional("type", Predicate::string())
                .allow_extra(),
        )
        .allow_extra()
        .into()
}

/// platform.upload.announce
pub fn announce() -> Schema {
    Schema::object()
        .required("account", Predicate::int_in_string())
        .required("category", Predicate::not_empty_string())
        .required("request_id", Predicate::format(Format::Hex32))
        .required("principal", Predicate::int_in_string())
        .required("service", Predicate::not_empty_string())
        .required("size", Predicate::pos_int())
        .required(
            "metadata",
            Schema::object()
                .required("reporter", Predicate::string())
                .required("stale_timestamp", Predicate::timestamp(TimestampFormat::Zulu)),
        )
        .required("url", Predicate::format(Format::AwsS3Url))
        .required("b64_identity", Predicate::b64_identity(identity_schema()))
        .required("timestamp", Predicate::timestamp(TimestampFormat::Fractional))
        .into()
}

/// Response of the SQS ReceiveMessage call
pub fn sqs() -> Schema {
    let http_headers = Schema::object()
        .required("x-amzn-requestid", Predicate::uuid())
        .required("date", Predicate::string())
        .required("content-type", Schema::constant("text/xml"))
        .required("content-length", Predicate::pos_int_in_string());

    let response_metadata = Schema::object()
        .required("RequestId", Predicate::uuid())
        .required("HTTPStatusCode", Predicate::pos_int())
        .required("RetryAttempts", Predicate::pos_int_or_zero())
        .required("HTTPHeaders", http_headers);

    let attributes = Schema::object()
        .required("SenderId", Predicate::pos_int_in_string())
        .required("ApproximateFirstReceiveTimestamp", Predicate::pos_int_in_string())
        .required("ApproximateReceiveCount", Predicate::pos_int_in_string())
        .required("SentTimestamp", Predicate::pos_int_in_string());

    let message = Schema::object()
        .required("MessageId", Predicate::uuid())
        .required("ReceiptHandle", Predicate::pos_int_in_string())
        .required("MD5OfBody", Predicate::format(Format::Digest(Digest::Md5)))
        .required("Body", Predicate::json_in_string())
        .required("Attributes", attributes);

    Schema::object()
        .required("ResponseMetadata", response_metadata)
        .optional("Messages", Schema::list_of(message))
        .into()
}
