//! `ScalingGroupClient` backed by the real AWS Auto Scaling API, grounded
//! on the `aws-config`/`aws-sdk-autoscaling` idiom used elsewhere in the
//! pack for exactly this kind of describe/set call shape.

use async_trait::async_trait;
use aws_sdk_autoscaling::Client;

use crate::clients::ScalingGroupClient;
use crate::core::asg::{AsgDto, AsgInstanceDto};
use crate::error::AutoscalerError;

pub struct AwsScalingGroupClient {
    client: Client,
}

impl AwsScalingGroupClient {
    pub async fn new() -> Self {
        let config = aws_config::load_from_env().await;
        Self {
            client: Client::new(&config),
        }
    }
}

#[async_trait]
impl ScalingGroupClient for AwsScalingGroupClient {
    async fn describe_instances(&self) -> Result<Vec<AsgInstanceDto>, AutoscalerError> {
        let response = self
            .client
            .describe_auto_scaling_instances()
            .send()
            .await
            .map_err(|err| AutoscalerError::ExternalUnavailable(err.to_string()))?;

        Ok(response
            .auto_scaling_instances()
            .iter()
            .filter_map(|instance| {
                Some(AsgInstanceDto {
                    instance_id: instance.instance_id()?.to_string(),
                    asg_name: instance.auto_scaling_group_name()?.to_string(),
                    zone: instance.availability_zone()?.to_string(),
                })
            })
            .collect())
    }

    async fn describe_groups(&self) -> Result<Vec<AsgDto>, AutoscalerError> {
        let response = self
            .client
            .describe_auto_scaling_groups()
            .send()
            .await
            .map_err(|err| AutoscalerError::ExternalUnavailable(err.to_string()))?;

        Ok(response
            .auto_scaling_groups()
            .iter()
            .map(|group| AsgDto {
                name: group.auto_scaling_group_name().to_string(),
                desired_capacity: group.desired_capacity() as i64,
                min_size: group.min_size() as i64,
                max_size: group.max_size() as i64,
            })
            .collect())
    }

    async fn set_desired_capacity(
        &self,
        asg_name: &str,
        desired: i64,
    ) -> Result<(), AutoscalerError> {
        self.client
            .set_desired_capacity()
            .auto_scaling_group_name(asg_name)
            .desired_capacity(desired as i32)
            .send()
            .await
            .map_err(|err| AutoscalerError::ExternalUnavailable(err.to_string()))?;
        Ok(())
    }
}
